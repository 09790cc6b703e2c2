//! Catalog registry orchestrating ingestion, lookup, and deletion.
//!
//! Composes the durable store with the artifact store behind explicit
//! constructor injection. All authorization happens in the caller via
//! `accounts::policy`; the registry only upholds content invariants.

use tracing::{debug, info, warn};

use super::store::{CatalogStore, Page};
use super::{CatalogEntry, CatalogError, EntryDraft, EntryId};
use crate::accounts::AccountId;
use crate::artifacts::{ArtifactError, ArtifactRef, ArtifactStore};
use crate::metainfo::{InfoHash, Metainfo};

/// Fields for manual entry creation, bypassing metadata parsing.
///
/// The hash is accepted in either letter case and stored canonically
/// lowercase. Size defaults to 0 and file count to 1 when unset.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub info_hash: String,
    pub name: String,
    pub description: Option<String>,
    pub size: Option<u64>,
    pub file_count: Option<u32>,
    pub artifact: Option<ArtifactRef>,
}

/// Partial update of an entry's display fields.
///
/// `None` leaves a field unchanged. For the description the inner option
/// distinguishes "set to a value" from "explicitly cleared":
/// `Some(None)` clears it, `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Result of deleting an entry.
///
/// Artifact removal is best-effort: a storage failure never blocks record
/// removal, but it is carried here so callers can surface it.
#[derive(Debug)]
pub struct DeleteOutcome {
    pub entry: CatalogEntry,
    pub artifact_error: Option<ArtifactError>,
}

/// Content registry over a durable store and an artifact store.
pub struct Registry<S, A> {
    store: S,
    artifacts: A,
}

impl<S: CatalogStore, A: ArtifactStore> Registry<S, A> {
    /// Creates a registry from its two collaborators.
    pub fn new(store: S, artifacts: A) -> Self {
        Self { store, artifacts }
    }

    /// Returns the backing durable store.
    ///
    /// Exposed for cascade hooks the identity system drives directly, such
    /// as `CatalogStore::remove_owned_by` on account deletion.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the backing artifact store.
    pub fn artifacts(&self) -> &A {
        &self.artifacts
    }

    /// First page of entries, newest first, optionally filtered by a
    /// case-insensitive name substring.
    ///
    /// # Errors
    ///
    /// - `CatalogError` - Store failure
    pub async fn list(
        &self,
        page_size: usize,
        search: Option<&str>,
    ) -> Result<Page<CatalogEntry>, CatalogError> {
        self.store.list(page_size, search).await
    }

    /// Looks up an entry by identifier.
    ///
    /// # Errors
    ///
    /// - `CatalogError` - Store failure
    pub async fn entry(&self, id: EntryId) -> Result<Option<CatalogEntry>, CatalogError> {
        self.store.entry(id).await
    }

    /// Looks up an entry by hex-encoded hash, accepting either letter case.
    ///
    /// Input that is not a 40-character hex string cannot name any entry and
    /// resolves to `None` rather than an error.
    ///
    /// # Errors
    ///
    /// - `CatalogError` - Store failure
    pub async fn entry_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<CatalogEntry>, CatalogError> {
        let Ok(info_hash) = InfoHash::from_hex(hash) else {
            return Ok(None);
        };

        debug!(%info_hash, "catalog hash lookup");
        self.store.entry_by_hash(&info_hash).await
    }

    /// Registers content from raw torrent bytes.
    ///
    /// Derives the content hash, persists the raw bytes as the entry's
    /// artifact, and inserts the entry. If the insert loses a race against a
    /// concurrent duplicate, the freshly stored artifact is removed again on
    /// a best-effort basis before the conflict is surfaced.
    ///
    /// # Errors
    ///
    /// - `CatalogError::InvalidMetadata` - Bytes are not valid torrent metadata
    /// - `CatalogError::DuplicateContent` - The derived hash is already registered
    /// - `CatalogError::Artifact` - Storing the raw bytes failed
    pub async fn ingest(
        &self,
        bytes: &[u8],
        owner: AccountId,
        name: String,
        description: Option<String>,
    ) -> Result<CatalogEntry, CatalogError> {
        let metainfo = Metainfo::from_bytes(bytes)?;

        if self.store.entry_by_hash(&metainfo.info_hash).await?.is_some() {
            return Err(CatalogError::DuplicateContent {
                info_hash: metainfo.info_hash,
            });
        }

        let artifact = self.artifacts.store(bytes).await?;

        let draft = EntryDraft {
            info_hash: metainfo.info_hash,
            name,
            description,
            size: metainfo.total_size,
            file_count: metainfo.file_count,
            artifact: Some(artifact.clone()),
            owner,
        };

        match self.store.insert(draft).await {
            Ok(entry) => {
                info!(
                    info_hash = %entry.info_hash,
                    id = %entry.id,
                    size = entry.size,
                    "content ingested"
                );
                Ok(entry)
            }
            Err(error) => {
                // Lost a race or the store rejected the insert; the blob we
                // just wrote has no owning record and must not leak.
                if let Err(cleanup) = self.artifacts.delete(&artifact).await {
                    warn!(%artifact, error = %cleanup, "orphaned artifact cleanup failed");
                }
                Err(error)
            }
        }
    }

    /// Registers content from explicitly supplied fields.
    ///
    /// # Errors
    ///
    /// - `CatalogError::InvalidContentHash` - Hash is not 40 hex characters
    /// - `CatalogError::DuplicateContent` - The hash is already registered
    pub async fn create(
        &self,
        new_entry: NewEntry,
        owner: AccountId,
    ) -> Result<CatalogEntry, CatalogError> {
        let info_hash = InfoHash::from_hex(&new_entry.info_hash).map_err(|_| {
            CatalogError::InvalidContentHash {
                input: new_entry.info_hash.clone(),
            }
        })?;

        let draft = EntryDraft {
            info_hash,
            name: new_entry.name,
            description: new_entry.description,
            size: new_entry.size.unwrap_or(0),
            file_count: new_entry.file_count.unwrap_or(1),
            artifact: new_entry.artifact,
            owner,
        };

        let entry = self.store.insert(draft).await?;
        info!(info_hash = %entry.info_hash, id = %entry.id, "content registered manually");
        Ok(entry)
    }

    /// Applies a partial update to an entry's display fields.
    ///
    /// # Errors
    ///
    /// - `CatalogError::EntryNotFound` - No entry under this identifier
    pub async fn update(
        &self,
        id: EntryId,
        update: EntryUpdate,
    ) -> Result<CatalogEntry, CatalogError> {
        let current = self
            .store
            .entry(id)
            .await?
            .ok_or(CatalogError::EntryNotFound { id })?;

        let name = update.name.unwrap_or(current.name);
        let description = match update.description {
            Some(description) => description,
            None => current.description,
        };

        self.store.update_entry(id, name, description).await
    }

    /// Deletes an entry, releasing its stored artifact.
    ///
    /// The artifact is removed first; if that fails the failure is logged,
    /// carried in the outcome, and the registry record is removed anyway.
    ///
    /// # Errors
    ///
    /// - `CatalogError::EntryNotFound` - No entry under this identifier
    pub async fn delete(&self, id: EntryId) -> Result<DeleteOutcome, CatalogError> {
        let entry = self
            .store
            .entry(id)
            .await?
            .ok_or(CatalogError::EntryNotFound { id })?;

        let mut artifact_error = None;
        if let Some(artifact) = &entry.artifact {
            if let Err(error) = self.artifacts.delete(artifact).await {
                warn!(%artifact, %error, "artifact removal failed during delete");
                artifact_error = Some(error);
            }
        }

        let entry = self.store.remove(id).await?;
        info!(info_hash = %entry.info_hash, id = %entry.id, "content deleted");

        Ok(DeleteOutcome {
            entry,
            artifact_error,
        })
    }
}
