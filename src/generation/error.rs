use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by text generators and the generation cache store.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No generator is configured (for example, no API key).
    #[error("{reason}")]
    Unavailable { reason: String },

    /// The provider call failed.
    #[error("provider error: {reason}")]
    Provider { reason: String },

    /// The provider answered without any text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed cache file: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GenerationError {
    /// Text handed to callers in place of a generated response.
    pub fn degraded_text(&self) -> String {
        match self {
            GenerationError::Unavailable { reason } => {
                format!("Text generation unavailable: {}", reason)
            }
            other => format!("Generation failed: {}", other),
        }
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;
