//! Berth Core - Torrent metadata ingestion and access control
//!
//! This crate provides the fundamental building blocks for a torrent
//! catalog: bencode decoding with canonical re-encoding, content-hash
//! derivation, the content registry, contribution accounting, and the
//! role-ranked authorization policy.

pub mod accounts;
pub mod artifacts;
pub mod bencode;
pub mod catalog;
pub mod config;
pub mod metainfo;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use accounts::{Account, AccountId, Role};
pub use artifacts::{ArtifactError, ArtifactRef, ArtifactStore};
pub use bencode::DecodeError;
pub use catalog::{CatalogEntry, CatalogError, CatalogStore, EntryId, Registry};
pub use config::BerthConfig;
pub use metainfo::{InfoHash, Metainfo, MetainfoError};

/// Core errors that can bubble up from any Berth subsystem.
#[derive(Debug, thiserror::Error)]
pub enum BerthError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Metadata error: {0}")]
    Metainfo(#[from] MetainfoError),

    #[error("Artifact storage error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BerthError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            BerthError::Catalog(error) => match error {
                CatalogError::InvalidMetadata(cause) => {
                    format!("Invalid torrent file: {cause}")
                }
                CatalogError::DuplicateContent { info_hash } => {
                    format!("Torrent {info_hash} has already been uploaded")
                }
                CatalogError::EntryNotFound { id } => format!("Torrent {id} not found"),
                CatalogError::InvalidContentHash { .. } => {
                    "Invalid content hash supplied".to_string()
                }
                CatalogError::Artifact(_) => "Storage error occurred".to_string(),
            },
            BerthError::Metainfo(cause) => format!("Invalid torrent file: {cause}"),
            BerthError::Artifact(_) => "Storage error occurred".to_string(),
            BerthError::Configuration { .. } => "Configuration error occurred".to_string(),
            BerthError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            BerthError::Configuration { .. }
                | BerthError::Metainfo(_)
                | BerthError::Catalog(
                    CatalogError::InvalidMetadata(_)
                        | CatalogError::InvalidContentHash { .. }
                        | CatalogError::DuplicateContent { .. }
                )
        )
    }
}

pub type Result<T> = std::result::Result<T, BerthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_name_the_conflicting_hash() {
        let error = BerthError::from(CatalogError::DuplicateContent {
            info_hash: InfoHash::new([0xab; 20]),
        });

        assert!(error.user_message().contains(&"ab".repeat(20)));
        assert!(error.is_user_error());
    }

    #[test]
    fn infrastructure_failures_are_not_user_errors() {
        let error = BerthError::Io(std::io::Error::other("disk on fire"));
        assert!(!error.is_user_error());
        assert_eq!(error.user_message(), "File system error occurred");
    }
}
