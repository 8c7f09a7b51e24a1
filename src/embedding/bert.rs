//! BERT sentence encoder with mean pooling.

use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;
use std::sync::Arc;

const WEIGHTS_FILENAME: &str = "model.safetensors";
const CONFIG_FILENAME: &str = "config.json";

/// Loaded encoder plus the hidden size it produces.
#[derive(Clone)]
pub struct SentenceBert {
    model: Arc<BertModel>,
    hidden_size: usize,
}

impl SentenceBert {
    /// Loads `config.json` and `model.safetensors` from `model_dir`.
    ///
    /// Checkpoints exported with a `bert.` prefix (or `roberta.`) are accepted as well as
    /// bare sentence-transformers exports.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_content = std::fs::read_to_string(model_dir.join(CONFIG_FILENAME))?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let weights_path = model_dir.join(WEIGHTS_FILENAME);
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)?
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), &config)?
        } else {
            BertModel::load(vb, &config)?
        };

        Ok(Self {
            model: Arc::new(model),
            hidden_size: config.hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Encodes a padded batch into L2-normalised sentence vectors.
    ///
    /// `input_ids` and `attention_mask` are `[batch, seq_len]`; padding positions carry a
    /// zero mask and do not contribute to the mean.
    pub fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self
            .model
            .forward(input_ids, &token_type_ids, Some(attention_mask))?;

        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.maximum(1e-9f32)?;
        let pooled = summed.broadcast_div(&counts)?;

        l2_normalize(&pooled)
    }
}

/// Row-wise L2 normalisation of a `[batch, dim]` tensor.
pub fn l2_normalize(t: &Tensor) -> Result<Tensor> {
    let norms = t.sqr()?.sum_keepdim(1)?.sqrt()?.maximum(1e-12f32)?;
    t.broadcast_div(&norms)
}
