//! PDF ingestion: directory walking, text extraction, chunking.

pub mod pdf;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use askdocs_core::chunker::{chunk_document, ChunkingConfig};
use askdocs_core::types::DocumentChunk;

/// Turns a directory of PDF files into an ordered chunk list.
///
/// One PDF is one document; its file name is the source label carried
/// by every chunk it produces.
pub struct DataProcessor {
    chunking: ChunkingConfig,
}

impl DataProcessor {
    pub fn new(chunking: ChunkingConfig) -> Self {
        Self { chunking }
    }

    /// Walk `data_dir` for PDFs and chunk each one.
    ///
    /// Files are visited in sorted order so repeated ingests of the same
    /// directory produce identical chunk positions.
    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<DocumentChunk>> {
        let files = list_pdf_files(data_dir);
        if files.is_empty() {
            println!("No .pdf files found under {}.", data_dir.display());
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            println!(
                "Processing file {}/{}: {}",
                file_index + 1,
                files.len(),
                file_path.display()
            );
            let text = pdf::extract_text(file_path)
                .with_context(|| format!("failed to extract {}", file_path.display()))?;
            if text.trim().is_empty() {
                tracing::warn!(path = %file_path.display(), "no extractable text, skipping");
                continue;
            }
            let chunks = self.process_text(&document_id(file_path), &text)?;
            all_chunks.extend(chunks);
        }
        println!("Processed {} files into {} chunks", files.len(), all_chunks.len());
        Ok(all_chunks)
    }

    /// Chunk already-extracted text under a source label.
    pub fn process_text(&self, source: &str, text: &str) -> Result<Vec<DocumentChunk>> {
        let chunks = chunk_document(source, text, &self.chunking)?;
        Ok(chunks)
    }
}

fn document_id(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.to_string_lossy().to_string())
}

fn list_pdf_files(root: &Path) -> Vec<PathBuf> {
    let mut pdf_files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            pdf_files.push(path.to_path_buf());
        }
    }
    pdf_files.sort();
    pdf_files
}
