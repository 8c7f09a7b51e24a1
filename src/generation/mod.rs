//! Cached text generation.
//!
//! [`GenerationCache`] maps `(purpose, prompt)` to generated text and persists it as
//! JSON. [`CareerAdvisor`] builds the three generation use cases on top of it.
//!
//! The cache grows without bound: nothing is evicted and nothing expires. Prompts are
//! built from profile text, so the file grows with the number of distinct profiles.

pub mod advisor;
pub mod cache;
pub mod error;
pub mod generator;
pub mod prompts;
pub mod store;


pub use advisor::{ADVANCED_TARGETS, CareerAdvisor, FALLBACK_BLOCK_NAME};
pub use cache::GenerationCache;
pub use error::{GenerationError, GenerationResult};
pub use generator::{GENERATION_TEMPERATURE, GenaiGenerator, TextGenerator, UnavailableGenerator};
pub use store::{GenerationEntries, GenerationStore, JsonFileStore};

#[cfg(any(test, feature = "mock"))]
pub use generator::ScriptedGenerator;
#[cfg(any(test, feature = "mock"))]
pub use store::MemoryGenerationStore;
