//! Catalog workflow against the filesystem artifact backend.

use berth_core::accounts::AccountId;
use berth_core::artifacts::{ArtifactStore, FileArtifactStore, open_artifact_store};
use berth_core::catalog::{EntryUpdate, MemoryCatalogStore, Registry};
use berth_core::config::{StorageBackend, StorageConfig};
use berth_core::test_fixtures::single_file_torrent;

#[tokio::test]
async fn ingest_writes_and_delete_removes_the_blob() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("torrents");
    let registry = Registry::new(
        MemoryCatalogStore::new(),
        FileArtifactStore::new(root.clone()),
    );

    let bytes = single_file_torrent("archive.tar", 2048);
    let entry = registry
        .ingest(&bytes, AccountId::new(1), "Archive".to_string(), None)
        .await
        .unwrap();

    let reference = entry.artifact.clone().unwrap();
    let blob_path = root.join(reference.as_str());
    assert_eq!(tokio::fs::read(&blob_path).await.unwrap(), bytes);

    let outcome = registry.delete(entry.id).await.unwrap();
    assert!(outcome.artifact_error.is_none());
    assert!(!blob_path.exists());
}

#[tokio::test]
async fn updates_leave_the_stored_blob_untouched() {
    let temp_dir = tempfile::tempdir().unwrap();
    let registry = Registry::new(
        MemoryCatalogStore::new(),
        FileArtifactStore::new(temp_dir.path().to_path_buf()),
    );

    let bytes = single_file_torrent("notes.txt", 64);
    let entry = registry
        .ingest(&bytes, AccountId::new(1), "Notes".to_string(), None)
        .await
        .unwrap();

    let updated = registry
        .update(
            entry.id,
            EntryUpdate {
                name: Some("Renamed notes".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.artifact, entry.artifact);
    let blob_path = temp_dir.path().join(entry.artifact.unwrap().as_str());
    assert_eq!(tokio::fs::read(&blob_path).await.unwrap(), bytes);
}

#[tokio::test]
async fn configured_filesystem_backend_round_trips() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        backend: StorageBackend::Filesystem,
        artifact_root: temp_dir.path().join("store"),
    };

    let store = open_artifact_store(&config);
    let reference = store.store(b"configured blob").await.unwrap();
    assert!(temp_dir.path().join("store").join(reference.as_str()).exists());

    store.delete(&reference).await.unwrap();
}
