use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::storage::StorageError;
use crate::storage::mmap::MmapError;

/// Errors raised while building or persisting competency vectors.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("artifact mapping failed: {0}")]
    Mmap(#[from] MmapError),

    #[error("artifact serialization failed: {0}")]
    Serialization(String),
}

pub type IndexResult<T> = Result<T, IndexError>;
