//! Where vector artifacts live between runs.

use std::path::{Path, PathBuf};

use rkyv::rancor::Error as RkyvError;
use tracing::debug;

use super::error::{IndexError, IndexResult};
use super::model::{ArchivedVectorArtifact, VectorArtifact};
use crate::storage::{MmapFileHandle, write_atomic};

/// Persistence backend for [`VectorArtifact`]s.
pub trait VectorStore: Send + Sync {
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> IndexResult<Option<VectorArtifact>>;

    fn save(&self, artifact: &VectorArtifact) -> IndexResult<()>;
}

impl<T: VectorStore + ?Sized> VectorStore for std::sync::Arc<T> {
    fn load(&self) -> IndexResult<Option<VectorArtifact>> {
        (**self).load()
    }

    fn save(&self, artifact: &VectorArtifact) -> IndexResult<()> {
        (**self).save(artifact)
    }
}

/// Single rkyv file, memory-mapped on load and replaced atomically on save.
#[derive(Debug, Clone)]
pub struct FileVectorStore {
    path: PathBuf,
}

impl FileVectorStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VectorStore for FileVectorStore {
    fn load(&self) -> IndexResult<Option<VectorArtifact>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let handle = MmapFileHandle::open(&self.path)?;
        let archived = handle.access_archived::<ArchivedVectorArtifact>()?;
        let artifact = rkyv::deserialize::<VectorArtifact, RkyvError>(archived)
            .map_err(|e| IndexError::Serialization(e.to_string()))?;

        debug!(
            path = %self.path.display(),
            bytes = handle.len(),
            entries = artifact.len(),
            "Loaded vector artifact"
        );

        Ok(Some(artifact))
    }

    fn save(&self, artifact: &VectorArtifact) -> IndexResult<()> {
        let bytes = rkyv::to_bytes::<RkyvError>(artifact)
            .map_err(|e| IndexError::Serialization(e.to_string()))?;
        write_atomic(&self.path, &bytes)?;

        debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            entries = artifact.len(),
            "Persisted vector artifact"
        );
        Ok(())
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MemoryVectorStore;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::storage::StorageError;

    /// In-memory store that counts saves and can simulate failures.
    #[derive(Debug, Default)]
    pub struct MemoryVectorStore {
        artifact: Mutex<Option<VectorArtifact>>,
        saves: AtomicUsize,
        fail_load: AtomicBool,
        fail_save: AtomicBool,
    }

    impl MemoryVectorStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_artifact(artifact: VectorArtifact) -> Self {
            let store = Self::default();
            *store.artifact.lock() = Some(artifact);
            store
        }

        pub fn artifact(&self) -> Option<VectorArtifact> {
            self.artifact.lock().clone()
        }

        pub fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        pub fn set_fail_load(&self, fail: bool) {
            self.fail_load.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_save(&self, fail: bool) {
            self.fail_save.store(fail, Ordering::SeqCst);
        }
    }

    impl VectorStore for MemoryVectorStore {
        fn load(&self) -> IndexResult<Option<VectorArtifact>> {
            if self.fail_load.load(Ordering::SeqCst) {
                return Err(IndexError::Serialization(
                    "simulated corrupt artifact".to_string(),
                ));
            }
            Ok(self.artifact.lock().clone())
        }

        fn save(&self, artifact: &VectorArtifact) -> IndexResult<()> {
            if self.fail_save.load(Ordering::SeqCst) {
                return Err(IndexError::Storage(StorageError::PersistFailed {
                    path: "memory".into(),
                    reason: "simulated write failure".to_string(),
                }));
            }
            *self.artifact.lock() = Some(artifact.clone());
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
