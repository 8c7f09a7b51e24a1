use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::error::GenerationResult;
use super::generator::TextGenerator;
use super::store::{GenerationEntries, GenerationStore};
use crate::hashing::generation_cache_key;

/// Content-addressed cache of generated texts.
///
/// Keys are `"{PURPOSE}_{blake3 hex}"` over the purpose tag and prompt, so an identical
/// request is served from the cache across restarts. Entries never expire and are never
/// evicted.
///
/// Writes are read-merge-write under a lock: the store is reloaded before each save so
/// entries added by another writer in the meantime survive.
pub struct GenerationCache {
    inner: Arc<CacheState>,
}

struct CacheState {
    store: Box<dyn GenerationStore>,
    entries: Mutex<GenerationEntries>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for GenerationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl GenerationCache {
    /// Loads persisted entries; an unreadable store starts empty.
    pub fn open<S: GenerationStore + 'static>(store: S) -> Self {
        let entries = match store.load() {
            Ok(entries) => {
                info!(entries = entries.len(), "Generation cache loaded");
                entries
            }
            Err(e) => {
                warn!(reason = "corrupt", error = %e, "Generation cache unreadable, starting empty");
                GenerationEntries::new()
            }
        };

        Self {
            inner: Arc::new(CacheState {
                store: Box::new(store),
                entries: Mutex::new(entries),
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.lock().is_empty()
    }

    /// Returns the cached text for `(purpose, prompt)` without generating.
    pub fn get(&self, purpose: &str, prompt: &str) -> Option<String> {
        self.inner
            .entries
            .lock()
            .get(&generation_cache_key(purpose, prompt))
            .cloned()
    }

    /// Returns the cached text, or generates, stores and persists it.
    ///
    /// Failures are returned as descriptive text and are not cached.
    pub async fn get_or_generate(
        &self,
        prompt: &str,
        purpose: &str,
        generator: &dyn TextGenerator,
    ) -> String {
        match self.try_get_or_generate(prompt, purpose, generator).await {
            Ok(text) => text,
            Err(e) => e.degraded_text(),
        }
    }

    /// Like [`get_or_generate`](Self::get_or_generate) but surfaces generator failures.
    pub async fn try_get_or_generate(
        &self,
        prompt: &str,
        purpose: &str,
        generator: &dyn TextGenerator,
    ) -> GenerationResult<String> {
        let key = generation_cache_key(purpose, prompt);

        if let Some(text) = self.inner.entries.lock().get(&key).cloned() {
            debug!(purpose, key = %key, "Generation cache hit");
            return Ok(text);
        }

        debug!(purpose, key = %key, generator = generator.name(), "Generation cache miss");
        let text = generator.generate(prompt).await.inspect_err(|e| {
            warn!(purpose, generator = generator.name(), error = %e, "Text generation failed");
        })?;

        // File I/O and fsync run off the async workers; the write completes before return.
        let inner = Arc::clone(&self.inner);
        let entry = text.clone();
        if let Err(e) =
            tokio::task::spawn_blocking(move || inner.insert_and_persist(key, entry)).await
        {
            error!(purpose, error = %e, "Generation cache write task failed");
        }
        Ok(text)
    }
}

impl CacheState {
    fn insert_and_persist(&self, key: String, text: String) {
        let _guard = self.write_lock.lock();

        let mut merged = match self.store.load() {
            Ok(on_disk) => on_disk,
            Err(e) => {
                warn!(reason = "corrupt", error = %e, "Generation cache unreadable before write, overwriting");
                GenerationEntries::new()
            }
        };

        let snapshot = {
            let mut entries = self.entries.lock();
            for (k, v) in std::mem::take(&mut merged) {
                entries.entry(k).or_insert(v);
            }
            entries.insert(key.clone(), text);
            entries.clone()
        };

        match self.store.save(&snapshot) {
            Ok(()) => debug!(key = %key, entries = snapshot.len(), "Generation cache persisted"),
            Err(e) => error!(key = %key, error = %e, "Failed to persist generation cache, keeping entry in memory"),
        }
    }
}
