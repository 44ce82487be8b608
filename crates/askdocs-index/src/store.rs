//! Durable chunk metadata, positionally aligned with the vector index.
//!
//! The artifact is a JSON array of chunk records: one record per index
//! position, so alignment is structural rather than a convention over
//! parallel text/source lists.

use std::fs;
use std::path::Path;

use askdocs_core::error::{Error, Result};
use askdocs_core::types::DocumentChunk;

use crate::{write_atomic, FlatIndex};

/// Write the chunk records next to the index via temp file + rename.
pub fn save_chunks(chunks: &[DocumentChunk], path: &Path) -> Result<()> {
    let bytes =
        serde_json::to_vec(chunks).map_err(|e| Error::Io(std::io::Error::other(e)))?;
    write_atomic(path, &bytes)?;
    tracing::debug!(path = %path.display(), chunks = chunks.len(), "chunk metadata saved");
    Ok(())
}

/// Read the chunk records back.
pub fn load_chunks(path: &Path) -> Result<Vec<DocumentChunk>> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::IndexNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(Error::Io(e)),
    };
    serde_json::from_slice(&bytes).map_err(|e| {
        Error::CorruptIndex(format!("unreadable chunk metadata at {}: {e}", path.display()))
    })
}

/// Load the index/metadata pair and verify positional alignment.
///
/// `expected_dim` should be the runtime embedder's dimension so a stale
/// index built with a different model is rejected at startup.
pub fn load_pair(
    index_path: &Path,
    chunks_path: &Path,
    expected_dim: Option<usize>,
) -> Result<(FlatIndex, Vec<DocumentChunk>)> {
    let index = FlatIndex::load(index_path, expected_dim)?;
    let chunks = load_chunks(chunks_path)?;
    if index.len() != chunks.len() {
        return Err(Error::CorruptIndex(format!(
            "index holds {} vectors but metadata holds {} chunks",
            index.len(),
            chunks.len()
        )));
    }
    Ok((index, chunks))
}
