//! Skillmatch library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`CompetencyStore`], [`JobStore`] - Validated competency and job tables
//! - [`EmbeddingCache`] - Persisted competency vectors with stable keys
//! - [`ScoringEngine`], [`ScoreReport`] - Block scores, job ranking, top competencies
//! - [`GenerationCache`], [`CareerAdvisor`] - Cached text generation
//! - [`ProfileAnalyzer`] - Enrich, score and advise in one call
//!
//! ## Embedding
//! - [`Embedder`] - Seam between the pipeline and the sentence model
//! - [`SentenceEncoder`], [`EncoderConfig`] - BERT encoder with a deterministic stub mode
//!
//! ## Utilities
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`validate_embedding_dim`] - Dimension validation
//! - Hashing functions for competency keys and generation-cache keys
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analysis;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod generation;
pub mod hashing;
pub mod index;
pub mod scoring;
pub mod storage;
pub mod store;

pub use analysis::{AnalysisError, AnalysisRequest, ProfileAnalysis, ProfileAnalyzer};
pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use embedding::{
    ENCODER_EMBEDDING_DIM, ENCODER_MAX_SEQ_LEN, Embedder, EmbeddingError, EncoderConfig,
    SentenceEncoder,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use generation::{
    CareerAdvisor, GenaiGenerator, GenerationCache, GenerationError, GenerationStore,
    JsonFileStore, TextGenerator, UnavailableGenerator,
};
#[cfg(any(test, feature = "mock"))]
pub use generation::{MemoryGenerationStore, ScriptedGenerator};
pub use hashing::{generation_cache_key, hash_competency, hash_generation, hash_to_u64};
pub use index::{
    CompetencyVectors, EmbeddingCache, FileVectorStore, IndexError, VectorArtifact, VectorStore,
};
#[cfg(any(test, feature = "mock"))]
pub use index::MemoryVectorStore;
pub use scoring::{
    CompetencyMatch, JobMatch, ScoreReport, ScoringEngine, ScoringError, ScoringParams,
};
pub use storage::{StorageError, write_atomic};
pub use store::{CompetencyRecord, CompetencyStore, JobRecord, JobStore, StoreError};
