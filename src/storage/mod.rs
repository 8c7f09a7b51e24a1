//! Storage primitives shared by the persisted caches.
//!
//! - [`mmap`] maps persisted artifacts read-only and validates rkyv archives in place.
//! - [`write_atomic`] replaces a file via temp file + fsync + rename so readers never
//!   observe a half-written artifact.

pub mod error;
pub mod mmap;


pub use error::{StorageError, StorageResult};
pub use mmap::MmapFileHandle;

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Writes `bytes` to `path`, replacing any previous content atomically.
///
/// The temp file is created in the destination directory so the final rename never
/// crosses a filesystem boundary. Parent directories are created on demand.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|_| StorageError::DirectoryUnavailable {
            path: parent.to_path_buf(),
        })?;
    }

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| StorageError::PersistFailed {
        path: path.to_path_buf(),
        reason: e.error.to_string(),
    })?;

    Ok(())
}
