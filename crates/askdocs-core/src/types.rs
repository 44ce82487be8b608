//! Domain types shared by the ingest and serving pipelines.

use serde::{Deserialize, Serialize};

/// Stable document identity: the source PDF's file name.
pub type DocumentId = String;

/// A chunk of a source document that is independently indexed.
///
/// - `text`: the sliding-window payload
/// - `source`: the originating document
/// - `ordinal`: position of the window within the parent document
///
/// Chunks are stored once per index position, so position `i` in the
/// vector index always refers to the same record here. Keeping a single
/// record per position (rather than parallel text/source sequences) makes
/// that alignment structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    pub source: DocumentId,
    pub ordinal: usize,
}

/// A retrieved chunk with its distance to the query.
///
/// Lower distance is better; retrieval always returns closest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub text: String,
    pub source: DocumentId,
    pub distance: f32,
}
