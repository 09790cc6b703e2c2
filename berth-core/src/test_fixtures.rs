//! Shared test fixtures for catalog and ingestion testing.
//!
//! Provides canonical torrent byte builders and collaborator doubles so
//! tests across modules exercise the same well-formed inputs.

use async_trait::async_trait;

use crate::accounts::{Account, AccountId, Role};
use crate::artifacts::{ArtifactError, ArtifactRef, ArtifactStore};
use crate::bencode::{self, Value};
use crate::catalog::{
    CatalogEntry, CatalogError, CatalogStore, EntryDraft, EntryId, MemoryCatalogStore, Page,
};
use crate::metainfo::InfoHash;

/// Builds canonical single-file torrent bytes with the given name and length.
pub fn single_file_torrent(name: &str, length: i64) -> Vec<u8> {
    let mut info = std::collections::BTreeMap::new();
    info.insert(b"length".to_vec(), Value::Integer(length));
    info.insert(b"name".to_vec(), Value::Bytes(name.as_bytes().to_vec()));

    document_with_info(info)
}

/// Builds canonical multi-file torrent bytes from (path, length) pairs.
pub fn multi_file_torrent(name: &str, files: &[(&str, i64)]) -> Vec<u8> {
    let entries = files
        .iter()
        .map(|(path, length)| {
            let mut file = std::collections::BTreeMap::new();
            file.insert(b"length".to_vec(), Value::Integer(*length));
            file.insert(
                b"path".to_vec(),
                Value::List(vec![Value::Bytes(path.as_bytes().to_vec())]),
            );
            Value::Dictionary(file)
        })
        .collect();

    let mut info = std::collections::BTreeMap::new();
    info.insert(b"files".to_vec(), Value::List(entries));
    info.insert(b"name".to_vec(), Value::Bytes(name.as_bytes().to_vec()));

    document_with_info(info)
}

fn document_with_info(info: std::collections::BTreeMap<Vec<u8>, Value>) -> Vec<u8> {
    let mut document = std::collections::BTreeMap::new();
    document.insert(
        b"announce".to_vec(),
        Value::Bytes(b"http://tracker.test/announce".to_vec()),
    );
    document.insert(b"info".to_vec(), Value::Dictionary(info));

    bencode::encode(&Value::Dictionary(document))
}

/// Builds an account with the given identity and role, zeroed counters.
pub fn account_with_role(id: u64, role: Role) -> Account {
    Account {
        id: AccountId::new(id),
        role,
        uploaded: 0,
        downloaded: 0,
        seed_time: 0,
        passkey: None,
    }
}

/// Catalog store double that loses every insert race.
///
/// Hash lookups report no entry, so ingestion proceeds past its early
/// duplicate check, but the insert itself fails with `DuplicateContent` as a
/// concurrent writer would cause. Exercises the post-store conflict path
/// where the freshly written artifact must be cleaned up again.
#[derive(Default)]
pub struct RacingInsertCatalogStore {
    inner: MemoryCatalogStore,
}

#[async_trait]
impl CatalogStore for RacingInsertCatalogStore {
    async fn insert(&self, draft: EntryDraft) -> Result<CatalogEntry, CatalogError> {
        Err(CatalogError::DuplicateContent {
            info_hash: draft.info_hash,
        })
    }

    async fn entry(&self, id: EntryId) -> Result<Option<CatalogEntry>, CatalogError> {
        self.inner.entry(id).await
    }

    async fn entry_by_hash(
        &self,
        _info_hash: &InfoHash,
    ) -> Result<Option<CatalogEntry>, CatalogError> {
        Ok(None)
    }

    async fn list(
        &self,
        page_size: usize,
        search: Option<&str>,
    ) -> Result<Page<CatalogEntry>, CatalogError> {
        self.inner.list(page_size, search).await
    }

    async fn update_entry(
        &self,
        id: EntryId,
        name: String,
        description: Option<String>,
    ) -> Result<CatalogEntry, CatalogError> {
        self.inner.update_entry(id, name, description).await
    }

    async fn remove(&self, id: EntryId) -> Result<CatalogEntry, CatalogError> {
        self.inner.remove(id).await
    }

    async fn remove_owned_by(&self, owner: AccountId) -> Result<usize, CatalogError> {
        self.inner.remove_owned_by(owner).await
    }
}

/// Artifact store double whose `delete` always fails.
///
/// Exercises the best-effort cleanup path: record removal proceeds while the
/// artifact failure is reported.
#[derive(Default)]
pub struct FailingDeleteArtifactStore;

#[async_trait]
impl ArtifactStore for FailingDeleteArtifactStore {
    async fn store(&self, _bytes: &[u8]) -> Result<ArtifactRef, ArtifactError> {
        Ok(ArtifactRef::new("fixture://stored"))
    }

    async fn delete(&self, _reference: &ArtifactRef) -> Result<(), ArtifactError> {
        Err(ArtifactError::Io(std::io::Error::other(
            "backing storage unavailable",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metainfo::Metainfo;

    #[test]
    fn built_torrents_derive_cleanly() {
        let single = Metainfo::from_bytes(&single_file_torrent("a.bin", 100)).unwrap();
        assert_eq!(single.total_size, 100);
        assert_eq!(single.file_count, 1);

        let multi =
            Metainfo::from_bytes(&multi_file_torrent("pack", &[("a", 1), ("b", 2)])).unwrap();
        assert_eq!(multi.total_size, 3);
        assert_eq!(multi.file_count, 2);
    }
}
