use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors returned by the storage primitives.
pub enum StorageError {
    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory could not be created.
    #[error("storage directory unavailable: {path}")]
    DirectoryUnavailable {
        /// Directory path.
        path: PathBuf,
    },

    /// Temp file could not be renamed over the destination.
    #[error("failed to persist {path}: {reason}")]
    PersistFailed {
        /// Destination path.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },
}

/// Convenience result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
