use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::index::IndexError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("competency vectors unavailable: {0}")]
    Index(#[from] IndexError),

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },
}

impl ScoringError {
    /// Returns `true` if the failure came from the embedding model, directly or while
    /// building competency vectors.
    pub fn is_embedding_failure(&self) -> bool {
        matches!(
            self,
            ScoringError::Embedding(_) | ScoringError::Index(IndexError::Embedding(_))
        )
    }
}
