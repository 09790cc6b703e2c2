//! Policy-gated catalog mutations and ledger evaluation.
//!
//! The registry enforces no authorization itself; these tests exercise the
//! caller-side pattern of consulting the policy predicates before mutating.

use berth_core::accounts::{
    Ratio, Role, can_create, can_delete, can_update, ensure_passkey, meets_requirement, ratio,
    regenerate_passkey,
};
use berth_core::artifacts::MemoryArtifactStore;
use berth_core::catalog::{MemoryCatalogStore, Registry};
use berth_core::config::{RatioConfig, RatioMode};
use berth_core::test_fixtures::{account_with_role, single_file_torrent};

#[tokio::test]
async fn member_upload_is_refused_before_reaching_the_registry() {
    let registry = Registry::new(MemoryCatalogStore::new(), MemoryArtifactStore::new());
    let member = account_with_role(1, Role::Member);

    assert!(!can_create(&member));
    // Caller never invokes ingest; the catalog stays empty.
    assert_eq!(registry.list(25, None).await.unwrap().total, 0);
}

#[tokio::test]
async fn moderator_mutates_foreign_entries() {
    let registry = Registry::new(MemoryCatalogStore::new(), MemoryArtifactStore::new());
    let contributor = account_with_role(1, Role::Contributor);
    let moderator = account_with_role(2, Role::Moderator);

    assert!(can_create(&contributor));
    let entry = registry
        .ingest(
            &single_file_torrent("upload.bin", 100),
            contributor.id,
            "Upload".to_string(),
            None,
        )
        .await
        .unwrap();

    // The uploader cannot delete their own entry, the moderator can.
    assert!(!can_delete(&contributor, &entry));
    assert!(can_update(&moderator, &entry));
    assert!(can_delete(&moderator, &entry));

    registry.delete(entry.id).await.unwrap();
    assert_eq!(registry.list(25, None).await.unwrap().total, 0);
}

#[test]
fn requirement_modes_select_the_enforced_evaluator() {
    let mut account = account_with_role(1, Role::Member);
    account.uploaded = 1_000_000;
    account.downloaded = 2_000_000;
    account.seed_time = 3600;

    assert_eq!(ratio(&account), Ratio::Finite(0.50));

    let full = RatioConfig {
        mode: RatioMode::Full,
        min_ratio: 0.5,
        min_seed_time: 86_400,
    };
    assert!(meets_requirement(&account, &full));

    let strict = RatioConfig {
        min_ratio: 1.0,
        ..full.clone()
    };
    assert!(!meets_requirement(&account, &strict));

    // Seed-time mode ignores the poor ratio entirely and vice versa.
    let seed_time = RatioConfig {
        mode: RatioMode::SeedTime,
        ..strict.clone()
    };
    assert!(!meets_requirement(&account, &seed_time));
    account.seed_time = 86_400;
    assert!(meets_requirement(&account, &seed_time));

    let off = RatioConfig {
        mode: RatioMode::Off,
        ..strict
    };
    account.downloaded = u64::MAX;
    assert!(meets_requirement(&account, &off));
}

#[test]
fn passkey_lifecycle_assigns_then_rotates() {
    let mut account = account_with_role(1, Role::Member);
    assert!(account.passkey.is_none());

    let assigned = ensure_passkey(&mut account).to_string();
    assert_eq!(assigned.len(), 32);
    assert!(assigned.chars().all(|c| c.is_ascii_alphanumeric()));

    // Ensure is idempotent, regenerate is not.
    assert_eq!(ensure_passkey(&mut account), assigned);
    let rotated = regenerate_passkey(&mut account);
    assert_ne!(rotated, assigned);
    assert_eq!(account.passkey.as_deref(), Some(rotated.as_str()));
}

#[test]
fn role_order_is_the_single_authorization_basis() {
    assert!(Role::Moderator.is_at_least(Role::Contributor));
    assert!(!Role::Contributor.is_at_least(Role::Moderator));
    assert!(!Role::Administrator.is_higher_than(Role::Administrator));
    assert_eq!(
        Role::at_least(Role::Contributor),
        vec![Role::Contributor, Role::Moderator, Role::Administrator]
    );
}
