//! Persisted vector artifact.

use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};

use crate::store::CompetencyStore;

/// Vector for one competency, tagged with its stable key.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct VectorEntry {
    /// [`CompetencyRecord::key`](crate::store::CompetencyRecord::key).
    pub key: u64,
    /// Source id, kept for inspection only.
    pub competency_id: String,
    pub vector: Vec<f32>,
}

/// Every competency vector produced by one model.
///
/// Stored as `rkyv` bytes and memory-mapped on load.
///
/// # Example
/// ```rust
/// use skillmatch::index::{VectorArtifact, VectorEntry};
///
/// let artifact = VectorArtifact {
///     model_id: "stub-2".to_string(),
///     dimension: 2,
///     entries: vec![VectorEntry { key: 7, competency_id: "C1".into(), vector: vec![1.0, 0.0] }],
/// };
/// assert_eq!(artifact.len(), 1);
/// ```
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct VectorArtifact {
    pub model_id: String,
    pub dimension: u32,
    pub entries: Vec<VectorEntry>,
}

/// Why a persisted artifact cannot serve the current store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    CountMismatch { stored: usize, expected: usize },
    MissingKey { competency_id: String },
    ModelMismatch { stored: String, expected: String },
    DimensionMismatch { stored: usize, expected: usize },
    MalformedVector { competency_id: String, len: usize },
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountMismatch { stored, expected } => {
                write!(f, "entry count {} != competency count {}", stored, expected)
            }
            Self::MissingKey { competency_id } => {
                write!(f, "no vector for competency {}", competency_id)
            }
            Self::ModelMismatch { stored, expected } => {
                write!(f, "model {} != active model {}", stored, expected)
            }
            Self::DimensionMismatch { stored, expected } => {
                write!(f, "dimension {} != active dimension {}", stored, expected)
            }
            Self::MalformedVector { competency_id, len } => {
                write!(f, "vector for {} has length {}", competency_id, len)
            }
        }
    }
}

impl VectorArtifact {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks the artifact can serve `store` for the given model.
    ///
    /// All-or-nothing: any mismatch invalidates the whole artifact.
    pub fn check(
        &self,
        store: &CompetencyStore,
        model_id: &str,
        dimension: usize,
    ) -> Result<(), Staleness> {
        if self.model_id != model_id {
            return Err(Staleness::ModelMismatch {
                stored: self.model_id.clone(),
                expected: model_id.to_string(),
            });
        }

        if self.dimension as usize != dimension {
            return Err(Staleness::DimensionMismatch {
                stored: self.dimension as usize,
                expected: dimension,
            });
        }

        if self.entries.len() != store.len() {
            return Err(Staleness::CountMismatch {
                stored: self.entries.len(),
                expected: store.len(),
            });
        }

        if let Some(entry) = self.entries.iter().find(|e| e.vector.len() != dimension) {
            return Err(Staleness::MalformedVector {
                competency_id: entry.competency_id.clone(),
                len: entry.vector.len(),
            });
        }

        let keys: std::collections::HashSet<u64> = self.entries.iter().map(|e| e.key).collect();
        if let Some(missing) = store.records().iter().find(|r| !keys.contains(&r.key())) {
            return Err(Staleness::MissingKey {
                competency_id: missing.id.clone(),
            });
        }

        Ok(())
    }
}
