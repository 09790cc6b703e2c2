//! Artifact storage for ingested metadata blobs.
//!
//! The catalog keeps the raw .torrent bytes of every ingested entry so they
//! can be re-served later. Storage is a pluggable collaborator behind the
//! `ArtifactStore` trait with filesystem and in-memory implementations,
//! selected by deployment configuration.

pub mod file_store;
pub mod memory_store;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use file_store::FileArtifactStore;
pub use memory_store::MemoryArtifactStore;

use crate::config::{StorageBackend, StorageConfig};

/// Opaque handle to a stored artifact.
///
/// Produced by `ArtifactStore::store` and persisted on the catalog entry;
/// callers never interpret its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    /// Creates ArtifactRef from an implementation-defined handle.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that occur during artifact storage operations.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {reference}")]
    NotFound { reference: ArtifactRef },

    #[error("Artifact I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage operations for raw metadata blobs.
///
/// Implementations are fail-fast with no internal retries; retry policy
/// belongs to the caller or an outer storage layer.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persists a blob and returns its handle.
    ///
    /// # Errors
    ///
    /// - `ArtifactError::Io` - Backend write failed
    async fn store(&self, bytes: &[u8]) -> Result<ArtifactRef, ArtifactError>;

    /// Removes a previously stored blob.
    ///
    /// # Errors
    ///
    /// - `ArtifactError::NotFound` - No blob under this handle
    /// - `ArtifactError::Io` - Backend removal failed
    async fn delete(&self, reference: &ArtifactRef) -> Result<(), ArtifactError>;
}

#[async_trait]
impl ArtifactStore for Box<dyn ArtifactStore> {
    async fn store(&self, bytes: &[u8]) -> Result<ArtifactRef, ArtifactError> {
        (**self).store(bytes).await
    }

    async fn delete(&self, reference: &ArtifactRef) -> Result<(), ArtifactError> {
        (**self).delete(reference).await
    }
}

/// Opens the artifact store selected by deployment configuration.
pub fn open_artifact_store(config: &StorageConfig) -> Box<dyn ArtifactStore> {
    match config.backend {
        StorageBackend::Filesystem => {
            Box::new(FileArtifactStore::new(config.artifact_root.clone()))
        }
        StorageBackend::Memory => Box::new(MemoryArtifactStore::new()),
    }
}
