use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a competency or job table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed table {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
