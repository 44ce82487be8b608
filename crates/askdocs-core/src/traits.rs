use crate::error::Result;

/// The embedding collaborator behind a stable interface.
///
/// Implementations must preserve input order, return exactly one vector
/// per input text, and keep `dim()` constant for the process lifetime.
pub trait Embedder: Send + Sync {
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    /// Maximum input length in tokens; longer inputs are truncated.
    fn max_len(&self) -> usize;
    /// Compute embeddings for a batch of input texts.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
