//! Durable-store contract for catalog entries, with an in-memory reference
//! implementation.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{CatalogEntry, CatalogError, EntryDraft, EntryId};
use crate::accounts::AccountId;
use crate::metainfo::InfoHash;

/// One page of catalog entries plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub total: usize,
}

/// Persistence operations for catalog entries.
///
/// Implementations must enforce `info_hash` uniqueness atomically
/// (unique-index semantics): of two concurrent inserts with the same hash,
/// exactly one succeeds and the other fails with `DuplicateContent`. The
/// durable store also owns the account cascade: deleting an account removes
/// its entries, exposed here as `remove_owned_by`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Inserts a new entry, assigning its identifier and timestamps.
    ///
    /// # Errors
    ///
    /// - `CatalogError::DuplicateContent` - An entry with this hash exists
    async fn insert(&self, draft: EntryDraft) -> Result<CatalogEntry, CatalogError>;

    /// Looks up an entry by identifier.
    async fn entry(&self, id: EntryId) -> Result<Option<CatalogEntry>, CatalogError>;

    /// Looks up an entry by canonical info hash.
    async fn entry_by_hash(
        &self,
        info_hash: &InfoHash,
    ) -> Result<Option<CatalogEntry>, CatalogError>;

    /// First page of entries, newest first.
    ///
    /// When a search term is given, only entries whose name contains it
    /// case-insensitively are returned; `total` counts all matches, not just
    /// the returned page.
    async fn list(
        &self,
        page_size: usize,
        search: Option<&str>,
    ) -> Result<Page<CatalogEntry>, CatalogError>;

    /// Replaces an entry's display fields and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// - `CatalogError::EntryNotFound` - No entry under this identifier
    async fn update_entry(
        &self,
        id: EntryId,
        name: String,
        description: Option<String>,
    ) -> Result<CatalogEntry, CatalogError>;

    /// Removes an entry, returning its final state.
    ///
    /// # Errors
    ///
    /// - `CatalogError::EntryNotFound` - No entry under this identifier
    async fn remove(&self, id: EntryId) -> Result<CatalogEntry, CatalogError>;

    /// Removes every entry owned by the given account, returning the count.
    ///
    /// Cascade hook invoked when the identity system deletes an account.
    async fn remove_owned_by(&self, owner: AccountId) -> Result<usize, CatalogError>;
}

#[derive(Default)]
struct MemoryCatalogState {
    entries: BTreeMap<u64, CatalogEntry>,
    by_hash: HashMap<InfoHash, u64>,
    next_id: u64,
}

/// In-memory catalog store for tests and simulation wiring.
///
/// The hash index is maintained in the same critical section as the entry
/// map, so uniqueness behaves like a relational unique index. Production
/// deployments substitute a relational implementation of `CatalogStore`.
#[derive(Default)]
pub struct MemoryCatalogStore {
    state: RwLock<MemoryCatalogState>,
}

impl MemoryCatalogStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn insert(&self, draft: EntryDraft) -> Result<CatalogEntry, CatalogError> {
        let mut state = self.state.write();

        if state.by_hash.contains_key(&draft.info_hash) {
            return Err(CatalogError::DuplicateContent {
                info_hash: draft.info_hash,
            });
        }

        state.next_id += 1;
        let id = state.next_id;
        let now = Utc::now();

        let entry = CatalogEntry {
            id: EntryId::new(id),
            info_hash: draft.info_hash,
            name: draft.name,
            description: draft.description,
            size: draft.size,
            file_count: draft.file_count,
            artifact: draft.artifact,
            owner: draft.owner,
            created_at: now,
            updated_at: now,
        };

        state.by_hash.insert(entry.info_hash, id);
        state.entries.insert(id, entry.clone());

        Ok(entry)
    }

    async fn entry(&self, id: EntryId) -> Result<Option<CatalogEntry>, CatalogError> {
        Ok(self.state.read().entries.get(&id.as_u64()).cloned())
    }

    async fn entry_by_hash(
        &self,
        info_hash: &InfoHash,
    ) -> Result<Option<CatalogEntry>, CatalogError> {
        let state = self.state.read();
        Ok(state
            .by_hash
            .get(info_hash)
            .and_then(|id| state.entries.get(id))
            .cloned())
    }

    async fn list(
        &self,
        page_size: usize,
        search: Option<&str>,
    ) -> Result<Page<CatalogEntry>, CatalogError> {
        let state = self.state.read();
        let term = search.map(str::to_lowercase);

        let mut matches: Vec<&CatalogEntry> = state
            .entries
            .values()
            .filter(|entry| match &term {
                Some(term) => entry.name.to_lowercase().contains(term),
                None => true,
            })
            .collect();

        // Newest first, insertion id as tiebreak for equal timestamps.
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.cmp(&a.id))
        });

        let total = matches.len();
        let entries = matches
            .into_iter()
            .take(page_size)
            .cloned()
            .collect();

        Ok(Page { entries, total })
    }

    async fn update_entry(
        &self,
        id: EntryId,
        name: String,
        description: Option<String>,
    ) -> Result<CatalogEntry, CatalogError> {
        let mut state = self.state.write();

        let entry = state
            .entries
            .get_mut(&id.as_u64())
            .ok_or(CatalogError::EntryNotFound { id })?;

        entry.name = name;
        entry.description = description;
        entry.updated_at = Utc::now();

        Ok(entry.clone())
    }

    async fn remove(&self, id: EntryId) -> Result<CatalogEntry, CatalogError> {
        let mut state = self.state.write();

        let entry = state
            .entries
            .remove(&id.as_u64())
            .ok_or(CatalogError::EntryNotFound { id })?;
        state.by_hash.remove(&entry.info_hash);

        Ok(entry)
    }

    async fn remove_owned_by(&self, owner: AccountId) -> Result<usize, CatalogError> {
        let mut state = self.state.write();

        let owned: Vec<u64> = state
            .entries
            .values()
            .filter(|entry| entry.owner == owner)
            .map(|entry| entry.id.as_u64())
            .collect();

        for id in &owned {
            if let Some(entry) = state.entries.remove(id) {
                state.by_hash.remove(&entry.info_hash);
            }
        }

        Ok(owned.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(hash_byte: u8, name: &str, owner: u64) -> EntryDraft {
        EntryDraft {
            info_hash: InfoHash::new([hash_byte; 20]),
            name: name.to_string(),
            description: None,
            size: 1000,
            file_count: 1,
            artifact: None,
            owner: AccountId::new(owner),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_timestamps() {
        let store = MemoryCatalogStore::new();

        let first = store.insert(draft(1, "first", 1)).await.unwrap();
        let second = store.insert(draft(2, "second", 1)).await.unwrap();

        assert_eq!(first.id, EntryId::new(1));
        assert_eq!(second.id, EntryId::new(2));
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_hashes() {
        let store = MemoryCatalogStore::new();
        store.insert(draft(7, "original", 1)).await.unwrap();

        let error = store.insert(draft(7, "copy", 2)).await.unwrap_err();
        assert!(matches!(error, CatalogError::DuplicateContent { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn lookups_by_id_and_hash() {
        let store = MemoryCatalogStore::new();
        let inserted = store.insert(draft(3, "lookup", 1)).await.unwrap();

        let by_id = store.entry(inserted.id).await.unwrap().unwrap();
        assert_eq!(by_id, inserted);

        let by_hash = store
            .entry_by_hash(&inserted.info_hash)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_hash, inserted);

        assert!(store.entry(EntryId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_returns_newest_first_with_total() {
        let store = MemoryCatalogStore::new();
        for (byte, name) in [(1, "alpha"), (2, "beta"), (3, "gamma")] {
            store.insert(draft(byte, name, 1)).await.unwrap();
        }

        let page = store.list(2, None).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].name, "gamma");
        assert_eq!(page.entries[1].name, "beta");
    }

    #[tokio::test]
    async fn list_search_is_case_insensitive_substring() {
        let store = MemoryCatalogStore::new();
        store
            .insert(draft(1, "Ubuntu 24.04 Desktop", 1))
            .await
            .unwrap();
        store
            .insert(draft(2, "Fedora Workstation", 1))
            .await
            .unwrap();
        store.insert(draft(3, "ubuntu-server", 1)).await.unwrap();

        let page = store.list(10, Some("UBUNTU")).await.unwrap();
        assert_eq!(page.total, 2);

        let substring = store.list(10, Some("work")).await.unwrap();
        assert_eq!(substring.total, 1);
        assert_eq!(substring.entries[0].name, "Fedora Workstation");
    }

    #[tokio::test]
    async fn update_replaces_fields_and_bumps_timestamp() {
        let store = MemoryCatalogStore::new();
        let inserted = store.insert(draft(1, "before", 1)).await.unwrap();

        let updated = store
            .update_entry(inserted.id, "after".to_string(), Some("notes".to_string()))
            .await
            .unwrap();

        assert_eq!(updated.name, "after");
        assert_eq!(updated.description.as_deref(), Some("notes"));
        assert!(updated.updated_at >= inserted.updated_at);

        let missing = store
            .update_entry(EntryId::new(42), "x".to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(missing, CatalogError::EntryNotFound { .. }));
    }

    #[tokio::test]
    async fn remove_frees_the_hash_for_reinsertion() {
        let store = MemoryCatalogStore::new();
        let inserted = store.insert(draft(5, "transient", 1)).await.unwrap();

        let removed = store.remove(inserted.id).await.unwrap();
        assert_eq!(removed.id, inserted.id);
        assert!(store.is_empty());

        store.insert(draft(5, "again", 1)).await.unwrap();
    }

    #[tokio::test]
    async fn remove_owned_by_cascades_only_that_account() {
        let store = MemoryCatalogStore::new();
        store.insert(draft(1, "mine", 1)).await.unwrap();
        store.insert(draft(2, "mine too", 1)).await.unwrap();
        let kept = store.insert(draft(3, "theirs", 2)).await.unwrap();

        let removed = store.remove_owned_by(AccountId::new(1)).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.entry(kept.id).await.unwrap().is_some());
        assert!(
            store
                .entry_by_hash(&InfoHash::new([1u8; 20]))
                .await
                .unwrap()
                .is_none()
        );
    }
}
