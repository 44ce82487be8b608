//! Text extraction from PDF files via `pdf-extract`.

use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// Extract the full text of a PDF document.
///
/// `pdf-extract` returns the whole document as one string with newlines
/// between text runs; callers treat it as a single flat text. Scanned
/// PDFs without a text layer come back empty rather than erroring.
pub fn extract_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| anyhow!("pdf extraction failed for {}: {e}", path.display()))?;
    Ok(text)
}
