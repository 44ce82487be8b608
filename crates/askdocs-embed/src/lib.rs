//! Embedding collaborator adapter.
//!
//! Wraps a local sentence-transformer encoder (all-MiniLM-L6-v2) behind
//! the [`Embedder`] trait, plus a deterministic fake embedder for tests
//! and offline runs. Both produce L2-normalized vectors of a fixed
//! dimension, discovered at load time and constant for the process.

pub mod device;
pub mod pool;

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context as _};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use serde::Deserialize;
use tokenizers::Tokenizer;

use askdocs_core::config::EmbedConfig;
use askdocs_core::error::{Error, Result};
use askdocs_core::traits::Embedder;

const MAX_LEN: usize = 256;

/// Subset of the HF `config.json` read directly.
#[derive(Deserialize)]
struct HfConfig {
    hidden_size: usize,
}

/// BERT sentence encoder with masked mean pooling.
pub struct SentenceEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
}

impl SentenceEmbedder {
    /// Load tokenizer and weights from `model_dir`, CPU-resident unless
    /// the `metal` feature is enabled. Any load failure surfaces as an
    /// embedding error; there is no fallback patching of model internals.
    pub fn load(model_dir: &Path) -> Result<Self> {
        Self::load_inner(model_dir).map_err(|e| Error::Embedding(format!("{e:#}")))
    }

    fn load_inner(model_dir: &Path) -> anyhow::Result<Self> {
        let device = device::select_device();

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            anyhow!("failed to load tokenizer from {}: {e}", tokenizer_path.display())
        })?;

        let config_path = model_dir.join("config.json");
        let config_json = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&config_json)?;
        let hf: HfConfig = serde_json::from_str(&config_json)?;

        let vb = load_weights(model_dir, &device)?;
        let model = BertModel::load(vb, &config)?;
        tracing::info!(dim = hf.hidden_size, dir = %model_dir.display(), "sentence encoder loaded");

        Ok(Self {
            model,
            tokenizer,
            device,
            dim: hf.hidden_size,
        })
    }

    fn embed_one(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let enc = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("tokenization failed: {e}"))?;
        let mut ids = enc.get_ids().to_vec();
        let mut mask = enc.get_attention_mask().to_vec();
        ids.truncate(MAX_LEN);
        mask.truncate(MAX_LEN);
        let seq_len = ids.len();

        let input_ids = Tensor::from_iter(ids, &self.device)?.reshape((1, seq_len))?;
        let attention_mask = Tensor::from_iter(mask, &self.device)?.reshape((1, seq_len))?;
        let token_type_ids = Tensor::zeros((1, seq_len), DType::U32, &self.device)?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = pool::masked_mean_l2(&hidden, &attention_mask)?;
        let vector = pooled.squeeze(0)?.to_vec1::<f32>()?;
        Ok(vector)
    }
}

impl Embedder for SentenceEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        MAX_LEN
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let vector = self
                .embed_one(text)
                .map_err(|e| Error::Embedding(format!("{e:#}")))?;
            if vector.len() != self.dim {
                return Err(Error::Embedding(format!(
                    "model returned dimension {} (expected {})",
                    vector.len(),
                    self.dim
                )));
            }
            out.push(vector);
        }
        Ok(out)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> anyhow::Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        // Safety: the file is mmapped read-only for the embedder's lifetime.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DTYPE, device)? };
        return Ok(vb);
    }
    let pickled = model_dir.join("pytorch_model.bin");
    if pickled.exists() {
        let weights = candle_core::pickle::read_all(&pickled)?;
        let weights_map: HashMap<String, Tensor> = weights.into_iter().collect();
        return Ok(VarBuilder::from_tensors(weights_map, DTYPE, device));
    }
    Err(anyhow!(
        "no model weights found in {} (expected model.safetensors or pytorch_model.bin)",
        model_dir.display()
    ))
}

/// Deterministic signed feature-hashing embedder.
///
/// Tokens hash into buckets with a sign bit, then the vector is
/// L2-normalized, so texts sharing vocabulary land close in cosine
/// space. No model files needed; used by tests and offline runs.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let h = hash_token(token);
            let bucket = (h as usize) % self.dim;
            // Sign bit decorrelates colliding tokens.
            let sign = if h & (1 << 63) == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        MAX_LEN
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

fn hash_token(token: &str) -> u64 {
    use std::hash::Hasher;
    let mut hasher = twox_hash::XxHash64::with_seed(0);
    hasher.write(token.as_bytes());
    hasher.finish()
}

/// Build the configured embedder. `APP_USE_FAKE_EMBEDDINGS=1` selects
/// the fake, which needs no model files.
pub fn get_default_embedder(config: &EmbedConfig) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    if use_fake {
        tracing::debug!(dim = config.fake_dim, "using fake embedder");
        return Ok(Box::new(FakeEmbedder::new(config.fake_dim)));
    }
    let model_dir = askdocs_core::config::expand_path(&config.model_dir);
    Ok(Box::new(SentenceEmbedder::load(&model_dir)?))
}
