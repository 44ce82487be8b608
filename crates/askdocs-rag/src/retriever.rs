//! Query-time retrieval: embed the question, search the index, map
//! positions back to chunk records.

use askdocs_core::error::{Error, Result};
use askdocs_core::traits::Embedder;
use askdocs_core::types::{DocumentChunk, ScoredChunk};
use askdocs_index::FlatIndex;

pub const DEFAULT_TOP_K: usize = 3;

pub struct Retriever {
    embedder: Box<dyn Embedder>,
    index: FlatIndex,
    chunks: Vec<DocumentChunk>,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("embedder", &"<dyn Embedder>")
            .field("index", &self.index)
            .field("chunks", &self.chunks)
            .finish()
    }
}

impl Retriever {
    /// The index/chunks pair must be positionally aligned;
    /// `store::load_pair` guarantees that for artifacts read from disk.
    pub fn new(
        embedder: Box<dyn Embedder>,
        index: FlatIndex,
        chunks: Vec<DocumentChunk>,
    ) -> Result<Self> {
        if index.len() != chunks.len() {
            return Err(Error::CorruptIndex(format!(
                "index holds {} vectors but metadata holds {} chunks",
                index.len(),
                chunks.len()
            )));
        }
        Ok(Self {
            embedder,
            index,
            chunks,
        })
    }

    /// The `min(k, indexed)` chunks nearest to `question`, closest first.
    ///
    /// The index normalizes the query with the same policy it applied at
    /// build time, so retrieval cannot mix metrics.
    pub fn retrieve(&self, question: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let query = self
            .embedder
            .embed_batch(&[question.to_string()])?
            .pop()
            .ok_or_else(|| Error::Retrieval("embedder returned no query vector".to_string()))?;

        let hits = self.index.search(&query, k)?;
        let mut results = Vec::with_capacity(hits.len());
        for (position, distance) in hits {
            let chunk = self.chunks.get(position).ok_or_else(|| {
                Error::Retrieval(format!("search returned position {position} beyond metadata"))
            })?;
            results.push(ScoredChunk {
                text: chunk.text.clone(),
                source: chunk.source.clone(),
                distance,
            });
        }
        Ok(results)
    }
}
