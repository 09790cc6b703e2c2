//! Filesystem-backed artifact storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::{ArtifactError, ArtifactRef, ArtifactStore};

/// Stores artifacts as individual files under a root directory.
///
/// Each blob is written to a freshly named `.torrent` file; the handle is the
/// file name relative to the root. The root directory is created on first
/// store if missing.
pub struct FileArtifactStore {
    root: PathBuf,
}

impl FileArtifactStore {
    /// Creates file storage rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory artifacts are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, reference: &ArtifactRef) -> PathBuf {
        self.root.join(reference.as_str())
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn store(&self, bytes: &[u8]) -> Result<ArtifactRef, ArtifactError> {
        fs::create_dir_all(&self.root).await?;

        let reference = ArtifactRef::new(format!("{}.torrent", Uuid::new_v4()));
        fs::write(self.path_for(&reference), bytes).await?;

        Ok(reference)
    }

    async fn delete(&self, reference: &ArtifactRef) -> Result<(), ArtifactError> {
        let path = self.path_for(reference);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Err(ArtifactError::NotFound {
                    reference: reference.clone(),
                })
            }
            Err(error) => Err(ArtifactError::Io(error)),
        }
    }
}
