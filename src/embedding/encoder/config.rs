use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;

/// Default encoder output dimension.
pub const ENCODER_EMBEDDING_DIM: usize = crate::constants::DEFAULT_EMBEDDING_DIM;

/// Default encoder max sequence length.
pub const ENCODER_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

const MAX_SAFETENSORS_HEADER: u64 = 100 * 1024 * 1024;

const FINGERPRINT_HEX_LEN: usize = 12;

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEncoder`](super::SentenceEncoder).
pub struct EncoderConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Max tokens considered per text.
    pub max_seq_len: usize,
    /// Output embedding dimension. Checked against the model's hidden size on load.
    pub embedding_dim: usize,
    /// Texts per forward pass.
    pub batch_size: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: ENCODER_MAX_SEQ_LEN,
            embedding_dim: ENCODER_EMBEDDING_DIM,
            batch_size: 32,
            testing_stub: false,
        }
    }
}

impl EncoderConfig {
    /// Config for an optional model directory; `None` selects stub mode.
    pub fn from_model_path(model_dir: Option<PathBuf>) -> Self {
        model_dir.map(Self::new).unwrap_or_else(Self::stub)
    }

    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be greater than zero".to_string(),
            });
        }

        if self.batch_size == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "batch_size must be greater than zero".to_string(),
            });
        }

        if self.testing_stub {
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        Ok(())
    }

    /// Returns `true` if the weights and tokenizer are both present.
    pub fn model_available(&self) -> bool {
        !self.model_dir.as_os_str().is_empty()
            && self.model_dir.join("model.safetensors").exists()
            && self.model_dir.join("tokenizer.json").exists()
    }

    /// Short blake3 digest of `config.json` and the safetensors header.
    ///
    /// The header lists every tensor with its dtype, shape and byte offsets, so swapping in
    /// different weights changes the digest without hashing the whole weight file.
    pub fn weights_fingerprint(&self) -> Result<String, EmbeddingError> {
        let mut hasher = blake3::Hasher::new();

        let config = self.model_dir.join("config.json");
        if config.exists() {
            hasher.update(&std::fs::read(&config)?);
        }
        hasher.update(b"|");

        let mut weights = File::open(self.model_dir.join("model.safetensors"))?;
        let mut len_bytes = [0u8; 8];
        weights.read_exact(&mut len_bytes)?;
        let header_len = u64::from_le_bytes(len_bytes);
        if header_len > MAX_SAFETENSORS_HEADER {
            return Err(EmbeddingError::ModelLoadFailed {
                reason: format!("safetensors header of {} bytes is too large", header_len),
            });
        }
        let mut header = Vec::with_capacity(header_len as usize);
        weights.take(header_len).read_to_end(&mut header)?;
        hasher.update(&header);

        let digest = hasher.finalize().to_hex();
        Ok(digest.as_str()[..FINGERPRINT_HEX_LEN].to_string())
    }

    /// Identifier recorded alongside persisted vectors.
    ///
    /// Vectors produced under a different identifier are never reused. Loaded models
    /// extend it with [`weights_fingerprint`](Self::weights_fingerprint).
    pub fn model_id(&self) -> String {
        if self.testing_stub {
            return format!("stub-{}", self.embedding_dim);
        }

        let name = self
            .model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.model_dir.display().to_string());
        format!("{}-{}", name, self.embedding_dim)
    }
}
