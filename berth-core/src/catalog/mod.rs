//! Content catalog: entries, registry operations, and the durable-store
//! contract.
//!
//! A catalog entry records one piece of shared content: its canonical hash,
//! display fields, derived sizes, the stored metadata artifact, and the
//! owning account. The registry performs no authorization; callers gate
//! mutations through `accounts::policy`.

pub mod registry;
pub mod store;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use registry::{DeleteOutcome, EntryUpdate, NewEntry, Registry};
pub use store::{CatalogStore, MemoryCatalogStore, Page};

use crate::accounts::AccountId;
use crate::artifacts::{ArtifactError, ArtifactRef};
use crate::metainfo::{InfoHash, MetainfoError};

/// Opaque catalog entry identifier assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Creates EntryId from a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying identifier as u64.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One registered piece of shared content.
///
/// The info hash is canonical lowercase by construction of `InfoHash` and
/// unique across all entries. `owner` is a foreign reference into the
/// external identity system; deleting that account cascades to its entries
/// at the store level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub info_hash: InfoHash,
    pub name: String,
    pub description: Option<String>,
    pub size: u64,
    pub file_count: u32,
    pub artifact: Option<ArtifactRef>,
    pub owner: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogEntry {
    /// Whether a metadata artifact is stored for this entry.
    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    /// Human-readable entry size.
    ///
    /// Divides by 1024 until the value drops below the next unit, rounding
    /// to at most two decimals with trailing zeros trimmed: "0 B", "1 KB",
    /// "1.5 KB". Distinct from the ledger's fixed-two-decimal stats format.
    pub fn size_display(&self) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

        let mut value = self.size as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }

        let mut text = format!("{:.2}", (value * 100.0).round() / 100.0);
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }

        format!("{text} {}", UNITS[unit])
    }
}

/// Fields for a new entry as handed to the store.
///
/// The store assigns the identifier and both timestamps on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub info_hash: InfoHash,
    pub name: String,
    pub description: Option<String>,
    pub size: u64,
    pub file_count: u32,
    pub artifact: Option<ArtifactRef>,
    pub owner: AccountId,
}

/// Errors that occur during catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid torrent metadata: {0}")]
    InvalidMetadata(#[from] MetainfoError),

    #[error("Content already registered: {info_hash}")]
    DuplicateContent { info_hash: InfoHash },

    #[error("Catalog entry {id} not found")]
    EntryNotFound { id: EntryId },

    #[error("Invalid content hash: {input:?}")]
    InvalidContentHash { input: String },

    #[error("Artifact storage error: {0}")]
    Artifact(#[from] ArtifactError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_size(size: u64) -> CatalogEntry {
        let now = Utc::now();
        CatalogEntry {
            id: EntryId::new(1),
            info_hash: InfoHash::new([0u8; 20]),
            name: "entry".to_string(),
            description: None,
            size,
            file_count: 1,
            artifact: None,
            owner: AccountId::new(1),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn size_display_trims_trailing_zeros() {
        assert_eq!(entry_with_size(0).size_display(), "0 B");
        assert_eq!(entry_with_size(500).size_display(), "500 B");
        assert_eq!(entry_with_size(1024).size_display(), "1 KB");
        assert_eq!(entry_with_size(1536).size_display(), "1.5 KB");
        assert_eq!(entry_with_size(1_048_576).size_display(), "1 MB");
        assert_eq!(entry_with_size(1_073_741_824).size_display(), "1 GB");
        assert_eq!(entry_with_size(1_099_511_627_776).size_display(), "1 TB");
    }

    #[test]
    fn size_display_keeps_meaningful_decimals() {
        assert_eq!(entry_with_size(1_126_400).size_display(), "1.07 MB");
        assert_eq!(entry_with_size(1_100).size_display(), "1.07 KB");
    }

    #[test]
    fn has_artifact_reflects_stored_blob() {
        let mut entry = entry_with_size(0);
        assert!(!entry.has_artifact());

        entry.artifact = Some(ArtifactRef::new("abc.torrent"));
        assert!(entry.has_artifact());
    }

    #[test]
    fn entries_serialize_with_hex_hash() {
        let entry = entry_with_size(42);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            json["info_hash"],
            "0000000000000000000000000000000000000000"
        );
        assert_eq!(json["size"], 42);
    }
}
