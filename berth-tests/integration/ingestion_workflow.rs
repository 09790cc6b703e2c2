//! End-to-end ingestion workflow over in-memory collaborators.

use berth_core::accounts::AccountId;
use berth_core::artifacts::MemoryArtifactStore;
use berth_core::catalog::{CatalogError, CatalogStore, MemoryCatalogStore, Registry};
use berth_core::test_fixtures::{
    FailingDeleteArtifactStore, multi_file_torrent, single_file_torrent,
};

fn registry() -> Registry<MemoryCatalogStore, MemoryArtifactStore> {
    Registry::new(MemoryCatalogStore::new(), MemoryArtifactStore::new())
}

#[tokio::test]
async fn ingest_list_search_and_lookup() {
    let registry = registry();
    let owner = AccountId::new(1);

    let ubuntu = registry
        .ingest(
            &single_file_torrent("ubuntu-24.04.iso", 4_000_000_000),
            owner,
            "Ubuntu 24.04".to_string(),
            Some("LTS release".to_string()),
        )
        .await
        .unwrap();
    let fedora = registry
        .ingest(
            &single_file_torrent("fedora-40.iso", 2_000_000_000),
            owner,
            "Fedora 40".to_string(),
            None,
        )
        .await
        .unwrap();

    let page = registry.list(25, None).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.entries[0].id, fedora.id);
    assert_eq!(page.entries[1].id, ubuntu.id);

    let filtered = registry.list(25, Some("ubuntu")).await.unwrap();
    assert_eq!(filtered.total, 1);
    assert_eq!(filtered.entries[0].id, ubuntu.id);

    // Hash lookup is case-insensitive against the canonical lowercase form.
    let uppercase = ubuntu.info_hash.to_string().to_uppercase();
    let found = registry.entry_by_hash(&uppercase).await.unwrap().unwrap();
    assert_eq!(found.id, ubuntu.id);
}

#[tokio::test]
async fn byte_distinct_uploads_with_equal_info_conflict() {
    let registry = registry();
    let owner = AccountId::new(1);

    // Same info dictionary wrapped in different outer documents.
    let first = b"d8:announce18:http://tracker.one4:infod6:lengthi1000e4:name8:test.txtee";
    let second = b"d8:announce18:http://tracker.two4:infod6:lengthi1000e4:name8:test.txtee";

    let entry = registry
        .ingest(first, owner, "First upload".to_string(), None)
        .await
        .unwrap();

    let error = registry
        .ingest(second, owner, "Second upload".to_string(), None)
        .await
        .unwrap_err();

    match error {
        CatalogError::DuplicateContent { info_hash } => {
            assert_eq!(info_hash, entry.info_hash);
        }
        other => panic!("expected duplicate conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_ingest_leaves_no_orphaned_artifact() {
    let store = MemoryCatalogStore::new();
    let artifacts = MemoryArtifactStore::new();
    let registry = Registry::new(store, artifacts);
    let bytes = single_file_torrent("unique.bin", 42);

    registry
        .ingest(&bytes, AccountId::new(1), "Unique".to_string(), None)
        .await
        .unwrap();
    registry
        .ingest(&bytes, AccountId::new(2), "Copy".to_string(), None)
        .await
        .unwrap_err();

    let page = registry.list(25, None).await.unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn failed_artifact_removal_still_deletes_the_record() {
    let registry = Registry::new(MemoryCatalogStore::new(), FailingDeleteArtifactStore);

    let entry = registry
        .ingest(
            &multi_file_torrent("pack", &[("a.bin", 10), ("b.bin", 20)]),
            AccountId::new(1),
            "Pack".to_string(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(entry.size, 30);
    assert_eq!(entry.file_count, 2);

    let outcome = registry.delete(entry.id).await.unwrap();
    assert!(outcome.artifact_error.is_some());
    assert_eq!(outcome.entry.id, entry.id);

    // The record is gone despite the storage failure.
    assert!(registry.entry(entry.id).await.unwrap().is_none());
}

#[tokio::test]
async fn account_deletion_cascades_through_the_store() {
    let registry = Registry::new(MemoryCatalogStore::new(), MemoryArtifactStore::new());
    let doomed = AccountId::new(1);
    let survivor = AccountId::new(2);

    for (name, owner) in [
        ("one.bin", doomed),
        ("two.bin", doomed),
        ("three.bin", survivor),
    ] {
        registry
            .ingest(
                &single_file_torrent(name, 100),
                owner,
                name.to_string(),
                None,
            )
            .await
            .unwrap();
    }

    let removed = registry.store().remove_owned_by(doomed).await.unwrap();
    assert_eq!(removed, 2);

    let remaining = registry.list(25, None).await.unwrap();
    assert_eq!(remaining.total, 1);
    assert_eq!(remaining.entries[0].owner, survivor);
}
