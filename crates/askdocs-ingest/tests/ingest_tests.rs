use std::fs;

use tempfile::TempDir;

use askdocs_core::chunker::ChunkingConfig;
use askdocs_ingest::DataProcessor;

#[test]
fn empty_directory_yields_no_chunks() {
    let tmp = TempDir::new().unwrap();

    let processor = DataProcessor::new(ChunkingConfig::default());
    let chunks = processor.process_directory(tmp.path()).expect("process");

    assert!(chunks.is_empty());
}

#[test]
fn non_pdf_files_are_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("notes.txt"), "plain text, not a pdf").unwrap();
    fs::write(tmp.path().join("data.csv"), "a,b,c").unwrap();

    let processor = DataProcessor::new(ChunkingConfig::default());
    let chunks = processor.process_directory(tmp.path()).expect("process");

    assert!(chunks.is_empty(), "only .pdf files are documents");
}

#[test]
fn process_text_tags_chunks_with_source() {
    let processor = DataProcessor::new(ChunkingConfig {
        chunk_size: 60,
        overlap: 10,
    });
    let text: String = "the homestead manual covers water, power and food storage. ".repeat(8);
    let chunks = processor.process_text("manual.pdf", &text).expect("process_text");

    assert!(chunks.len() > 1);
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.source, "manual.pdf");
        assert_eq!(c.ordinal, i);
        assert!(c.text.chars().count() <= 60);
    }
}
