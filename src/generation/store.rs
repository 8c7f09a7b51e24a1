//! Persistence for generated texts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::GenerationResult;
use crate::storage::write_atomic;

/// Key/value snapshot of the cache file.
pub type GenerationEntries = BTreeMap<String, String>;

/// Backend holding generated texts between runs.
pub trait GenerationStore: Send + Sync {
    /// Returns an empty map when nothing has been persisted yet.
    fn load(&self) -> GenerationResult<GenerationEntries>;

    fn save(&self, entries: &GenerationEntries) -> GenerationResult<()>;
}

/// Pretty-printed UTF-8 JSON object with sorted keys, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GenerationStore for JsonFileStore {
    fn load(&self) -> GenerationResult<GenerationEntries> {
        if !self.path.exists() {
            return Ok(GenerationEntries::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, entries: &GenerationEntries) -> GenerationResult<()> {
        let json = serde_json::to_string_pretty(entries)?;
        write_atomic(&self.path, json.as_bytes())?;
        Ok(())
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MemoryGenerationStore;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::generation::error::GenerationError;

    /// In-memory store that counts saves and can simulate failures.
    #[derive(Debug, Default)]
    pub struct MemoryGenerationStore {
        entries: Mutex<GenerationEntries>,
        saves: AtomicUsize,
        fail_load: AtomicBool,
        fail_save: AtomicBool,
    }

    impl MemoryGenerationStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entries(entries: GenerationEntries) -> Self {
            let store = Self::default();
            *store.entries.lock() = entries;
            store
        }

        pub fn entries(&self) -> GenerationEntries {
            self.entries.lock().clone()
        }

        /// Writes an entry behind the cache's back, as another process would.
        pub fn insert_external(&self, key: impl Into<String>, text: impl Into<String>) {
            self.entries.lock().insert(key.into(), text.into());
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

    impl GenerationStore for MemoryGenerationStore {
        fn load(&self) -> GenerationResult<GenerationEntries> {
            if self.fail_load.load(Ordering::SeqCst) {
                return Err(GenerationError::Io(std::io::Error::other(
                    "simulated corrupt cache file",
                )));
            }
            Ok(self.entries.lock().clone())
        }

        fn save(&self, entries: &GenerationEntries) -> GenerationResult<()> {
            if self.fail_save.load(Ordering::SeqCst) {
                return Err(GenerationError::Io(std::io::Error::other(
                    "simulated write failure",
                )));
            }
            *self.entries.lock() = entries.clone();
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

impl<T: GenerationStore + ?Sized> GenerationStore for std::sync::Arc<T> {
    fn load(&self) -> GenerationResult<GenerationEntries> {
        (**self).load()
    }

    fn save(&self, entries: &GenerationEntries) -> GenerationResult<()> {
        (**self).save(entries)
    }
}
