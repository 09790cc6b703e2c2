//! Authorization rules for catalog mutations.
//!
//! Three pure predicates over an acting account and, where relevant, the
//! target entry. They are the complete authorization surface for the catalog:
//! the catalog itself performs no checks, so every caller must consult these
//! before mutating and convert a `false` into its own boundary rejection.

use super::Account;
use super::role::Role;
use crate::catalog::CatalogEntry;

/// Whether the account may create catalog entries.
///
/// Contributors and above can upload.
pub fn can_create(actor: &Account) -> bool {
    actor.role.is_at_least(Role::Contributor)
}

/// Whether the account may update the given entry.
///
/// Owners can update their own entries; moderators and above can update any.
pub fn can_update(actor: &Account, entry: &CatalogEntry) -> bool {
    actor.id == entry.owner || actor.role.is_at_least(Role::Moderator)
}

/// Whether the account may delete the given entry.
///
/// Only moderators and above can delete, ownership notwithstanding.
pub fn can_delete(actor: &Account, _entry: &CatalogEntry) -> bool {
    actor.role.is_at_least(Role::Moderator)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::accounts::AccountId;
    use crate::catalog::EntryId;
    use crate::metainfo::InfoHash;

    fn actor(id: u64, role: Role) -> Account {
        Account {
            id: AccountId::new(id),
            role,
            uploaded: 0,
            downloaded: 0,
            seed_time: 0,
            passkey: None,
        }
    }

    fn entry_owned_by(owner: u64) -> CatalogEntry {
        let now = Utc::now();
        CatalogEntry {
            id: EntryId::new(1),
            info_hash: InfoHash::new([0u8; 20]),
            name: "ubuntu-24.04.iso".to_string(),
            description: None,
            size: 0,
            file_count: 1,
            artifact: None,
            owner: AccountId::new(owner),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn members_cannot_mutate_anything_foreign() {
        let member = actor(1, Role::Member);
        let entry = entry_owned_by(2);

        assert!(!can_create(&member));
        assert!(!can_update(&member, &entry));
        assert!(!can_delete(&member, &entry));
    }

    #[test]
    fn contributors_create_and_update_own_entries_only() {
        let contributor = actor(1, Role::Contributor);
        let own = entry_owned_by(1);
        let foreign = entry_owned_by(2);

        assert!(can_create(&contributor));
        assert!(can_update(&contributor, &own));
        assert!(!can_update(&contributor, &foreign));
        assert!(!can_delete(&contributor, &own));
    }

    #[test]
    fn owners_update_regardless_of_role() {
        let member = actor(3, Role::Member);
        let own = entry_owned_by(3);

        assert!(can_update(&member, &own));
    }

    #[test]
    fn moderators_update_and_delete_any_entry() {
        let moderator = actor(1, Role::Moderator);
        let foreign = entry_owned_by(2);

        assert!(can_create(&moderator));
        assert!(can_update(&moderator, &foreign));
        assert!(can_delete(&moderator, &foreign));
    }

    #[test]
    fn administrators_hold_every_permission() {
        let administrator = actor(1, Role::Administrator);
        let foreign = entry_owned_by(2);

        assert!(can_create(&administrator));
        assert!(can_update(&administrator, &foreign));
        assert!(can_delete(&administrator, &foreign));
    }
}
