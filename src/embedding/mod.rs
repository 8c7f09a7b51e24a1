//! Sentence embedding.
//!
//! [`Embedder`] is the seam the rest of the crate depends on. [`SentenceEncoder`] is the
//! production implementation (BERT with mean pooling, or deterministic stub vectors when
//! no model is configured).

/// BERT sentence model with mean pooling.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Sentence encoder (model + stub backends).
pub mod encoder;
mod error;
/// Tokenizer loading helpers.
pub mod utils;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use encoder::{ENCODER_EMBEDDING_DIM, ENCODER_MAX_SEQ_LEN, EncoderConfig, SentenceEncoder};
pub use error::EmbeddingError;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

/// Maps texts to fixed-length vectors.
///
/// Implementations must be deterministic for fixed inputs and return exactly one vector
/// per text, in input order.
pub trait Embedder: Send + Sync {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Length of every vector returned by [`Embedder::encode`].
    fn dimension(&self) -> usize;

    /// Identifies the model; persisted vectors from another model are never reused.
    fn model_id(&self) -> &str;
}
