//! In-memory artifact storage for tests and simulation wiring.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{ArtifactError, ArtifactRef, ArtifactStore};

/// Keeps artifacts in a process-local map.
///
/// Reference implementation for tests and deterministic simulation; nothing
/// survives the process.
#[derive(Default)]
pub struct MemoryArtifactStore {
    blobs: RwLock<HashMap<ArtifactRef, Vec<u8>>>,
}

impl MemoryArtifactStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a blob is stored under the given handle.
    pub fn contains(&self, reference: &ArtifactRef) -> bool {
        self.blobs.read().contains_key(reference)
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn store(&self, bytes: &[u8]) -> Result<ArtifactRef, ArtifactError> {
        let reference = ArtifactRef::new(format!("mem://{}", Uuid::new_v4()));
        self.blobs.write().insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }

    async fn delete(&self, reference: &ArtifactRef) -> Result<(), ArtifactError> {
        match self.blobs.write().remove(reference) {
            Some(_) => Ok(()),
            None => Err(ArtifactError::NotFound {
                reference: reference.clone(),
            }),
        }
    }
}
