//! Sliding-window chunker: fixed-size character windows with overlap.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::DocumentChunk;

/// Chunking parameters. `overlap` must stay below `chunk_size` or the
/// window would never advance.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window length in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive windows.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be positive".to_string()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Split `text` into windows of `chunk_size` characters, each sharing
/// `overlap` characters with its predecessor. The final window may be
/// shorter; empty text yields no windows.
///
/// Windows are cut on character boundaries, so multi-byte input never
/// splits a code point. Pure function of its inputs.
pub fn chunk(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    ChunkingConfig { chunk_size, overlap }.validate()?;

    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }
    Ok(chunks)
}

/// Chunk one document's extracted text into ordered [`DocumentChunk`]s.
pub fn chunk_document(source: &str, text: &str, config: &ChunkingConfig) -> Result<Vec<DocumentChunk>> {
    let windows = chunk(text, config.chunk_size, config.overlap)?;
    Ok(windows
        .into_iter()
        .enumerate()
        .map(|(ordinal, text)| DocumentChunk {
            text,
            source: source.to_string(),
            ordinal,
        })
        .collect())
}
