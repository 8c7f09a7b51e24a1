//! Competency vector cache.
//!
//! Embedding the whole taxonomy is the expensive step of scoring, so vectors are computed
//! once per (store, model) and persisted. [`EmbeddingCache::ensure`] decides between the
//! in-process snapshot, the persisted artifact, and a full rebuild.
//!
//! ## Validity
//!
//! A persisted artifact is reused only if it was produced by the active model, has the
//! active dimension, holds exactly one entry per competency, and has an entry for every
//! competency key. Anything else triggers a full rebuild; there is no partial update.
//!
//! Vectors are looked up by [`CompetencyRecord::key`](crate::store::CompetencyRecord::key),
//! never by row position, so a reordered table reuses its vectors correctly.

pub mod error;
pub mod model;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult};
pub use model::{Staleness, VectorArtifact, VectorEntry};
pub use store::{FileVectorStore, VectorStore};

#[cfg(any(test, feature = "mock"))]
pub use store::MemoryVectorStore;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::constants::validate_embedding_dim;
use crate::embedding::{Embedder, EmbeddingError};
use crate::store::CompetencyStore;

/// Validated vectors for one competency store, keyed by competency key.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetencyVectors {
    model_id: String,
    dimension: usize,
    by_key: HashMap<u64, Vec<f32>>,
    len: usize,
}

impl CompetencyVectors {
    fn from_artifact(artifact: VectorArtifact) -> Self {
        let len = artifact.entries.len();
        let by_key = artifact
            .entries
            .into_iter()
            .map(|entry| (entry.key, entry.vector))
            .collect();

        Self {
            model_id: artifact.model_id,
            dimension: artifact.dimension as usize,
            by_key,
            len,
        }
    }

    /// Number of vectors; equals the store length it was validated against.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn get(&self, key: u64) -> Option<&[f32]> {
        self.by_key.get(&key).map(Vec::as_slice)
    }

    /// Resolves one vector per record, in store order.
    ///
    /// Returns `None` if any record has no vector.
    pub fn aligned<'a>(&'a self, store: &CompetencyStore) -> Option<Vec<&'a [f32]>> {
        store.records().iter().map(|r| self.get(r.key())).collect()
    }

    fn covers(&self, store: &CompetencyStore, model_id: &str, dimension: usize) -> bool {
        self.model_id == model_id
            && self.dimension == dimension
            && self.len == store.len()
            && store.records().iter().all(|r| self.by_key.contains_key(&r.key()))
    }
}

/// Builds, validates and persists competency vectors.
pub struct EmbeddingCache {
    embedder: Arc<dyn Embedder>,
    store: Box<dyn VectorStore>,
    /// Published only after a build or load completes.
    snapshot: RwLock<Option<Arc<CompetencyVectors>>>,
    rebuild_lock: Mutex<()>,
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("model_id", &self.embedder.model_id())
            .field("warm", &self.is_warm())
            .finish()
    }
}

impl EmbeddingCache {
    pub fn new<S: VectorStore + 'static>(embedder: Arc<dyn Embedder>, store: S) -> Self {
        Self {
            embedder,
            store: Box::new(store),
            snapshot: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Returns `true` once vectors have been validated in this process.
    ///
    /// Never waits for a rebuild in progress.
    pub fn is_warm(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// Number of vectors in the in-process snapshot, if any.
    pub fn snapshot_len(&self) -> Option<usize> {
        self.snapshot.read().as_ref().map(|v| v.len())
    }

    /// Returns one vector per competency, rebuilding and persisting them if needed.
    ///
    /// At most one rebuild runs at a time; concurrent callers wait for it and then
    /// reuse its result.
    pub fn ensure(&self, competencies: &CompetencyStore) -> IndexResult<Arc<CompetencyVectors>> {
        let model_id = self.embedder.model_id();
        let dimension = self.embedder.dimension();

        if let Some(vectors) = self.current(competencies, model_id, dimension) {
            return Ok(vectors);
        }

        let _rebuild = self.rebuild_lock.lock();
        if let Some(vectors) = self.current(competencies, model_id, dimension) {
            return Ok(vectors);
        }

        let vectors = match self.load_valid(competencies, model_id, dimension) {
            Some(artifact) => CompetencyVectors::from_artifact(artifact),
            None => CompetencyVectors::from_artifact(self.rebuild(competencies)?),
        };

        let vectors = Arc::new(vectors);
        *self.snapshot.write() = Some(Arc::clone(&vectors));
        Ok(vectors)
    }

    fn current(
        &self,
        competencies: &CompetencyStore,
        model_id: &str,
        dimension: usize,
    ) -> Option<Arc<CompetencyVectors>> {
        self.snapshot
            .read()
            .as_ref()
            .filter(|vectors| vectors.covers(competencies, model_id, dimension))
            .map(Arc::clone)
    }

    fn load_valid(
        &self,
        competencies: &CompetencyStore,
        model_id: &str,
        dimension: usize,
    ) -> Option<VectorArtifact> {
        match self.store.load() {
            Ok(Some(artifact)) => match artifact.check(competencies, model_id, dimension) {
                Ok(()) => {
                    info!(
                        entries = artifact.len(),
                        model_id, "Reusing persisted competency vectors"
                    );
                    Some(artifact)
                }
                Err(staleness) => {
                    info!(
                        reason = "stale",
                        detail = %staleness,
                        "Persisted competency vectors invalid, rebuilding"
                    );
                    None
                }
            },
            Ok(None) => {
                info!(reason = "absent", "No persisted competency vectors, building");
                None
            }
            Err(e) => {
                warn!(
                    reason = "corrupt",
                    error = %e,
                    "Persisted competency vectors unreadable, rebuilding"
                );
                None
            }
        }
    }

    fn rebuild(&self, competencies: &CompetencyStore) -> IndexResult<VectorArtifact> {
        let started = Instant::now();
        let dimension = self.embedder.dimension();
        let texts: Vec<&str> = competencies
            .records()
            .iter()
            .map(|r| r.text.as_str())
            .collect();

        let vectors = self.embedder.encode(&texts)?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            }
            .into());
        }

        let mut entries = Vec::with_capacity(vectors.len());
        for (record, vector) in competencies.records().iter().zip(vectors) {
            validate_embedding_dim(vector.len(), dimension).map_err(EmbeddingError::from)?;
            entries.push(VectorEntry {
                key: record.key(),
                competency_id: record.id.clone(),
                vector,
            });
        }

        let artifact = VectorArtifact {
            model_id: self.embedder.model_id().to_string(),
            dimension: dimension as u32,
            entries,
        };

        info!(
            entries = artifact.len(),
            model_id = %artifact.model_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Competency vectors built"
        );

        if let Err(e) = self.store.save(&artifact) {
            error!(error = %e, "Failed to persist competency vectors, continuing in memory");
        }

        Ok(artifact)
    }
}
