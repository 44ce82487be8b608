//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `APP_*` env vars (double
//! underscore separates sections, e.g. `APP_DATA__PDF_DIR`). Provides
//! helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use std::env;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::chunker::ChunkingConfig;
use crate::error::{Error, Result};

/// Load `.env` from the working directory (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub chunking: ChunkingConfig,
    pub embed: EmbedConfig,
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory scanned for source PDFs at ingest time.
    pub pdf_dir: String,
    /// Directory holding the index + chunk metadata artifacts.
    pub index_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            pdf_dir: "data".to_string(),
            index_dir: "embeddings".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Directory with `tokenizer.json`, `config.json` and model weights.
    pub model_dir: String,
    /// Dimensionality of the fake embedder; the real model reports its own.
    pub fake_dim: usize,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            model_dir: "models/all-MiniLM-L6-v2".to_string(),
            fake_dim: 384,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on one completion request, in seconds.
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".to_string(),
            model: "llama3-8b-8192".to_string(),
            temperature: 0.0,
            max_tokens: 1024,
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("APP_").split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.chunking.validate()?;
        tracing::debug!(
            pdf_dir = %config.data.pdf_dir,
            index_dir = %config.data.index_dir,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Path of the serialized vector index artifact.
    pub fn index_path(&self) -> PathBuf {
        expand_path(&self.data.index_dir).join("index.bin")
    }

    /// Path of the chunk metadata artifact, positionally aligned with the index.
    pub fn chunks_path(&self) -> PathBuf {
        expand_path(&self.data.index_dir).join("chunks.json")
    }

    pub fn pdf_dir(&self) -> PathBuf {
        expand_path(&self.data.pdf_dir)
    }

    pub fn model_dir(&self) -> PathBuf {
        expand_path(&self.embed.model_dir)
    }
}

/// Resolve the completion API key from the environment (or `.env`).
/// Absence is a fatal startup condition, not a per-query error.
pub fn completion_api_key() -> Result<String> {
    env::var("GROQ_API_KEY")
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::InvalidConfig(
                "GROQ_API_KEY is not set; add it to the environment or a .env file".to_string(),
            )
        })
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}
