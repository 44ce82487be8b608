use askdocs_core::chunker::{chunk, chunk_document, ChunkingConfig};
use askdocs_core::error::Error;

#[test]
fn every_character_appears_in_some_chunk() {
    let text: String = "the quick brown fox jumps over the lazy dog ".repeat(30);
    let chunk_size = 100;
    let overlap = 20;
    let chunks = chunk(&text, chunk_size, overlap).expect("chunk");

    // Walking the windows at `step` covers the whole text.
    let step = chunk_size - overlap;
    let mut covered = 0usize;
    for (i, c) in chunks.iter().enumerate() {
        let start = i * step;
        assert!(start <= covered, "no gap before window {i}");
        covered = covered.max(start + c.chars().count());
    }
    assert_eq!(covered, text.chars().count(), "windows cover the full text");
}

#[test]
fn empty_text_yields_no_chunks() {
    let chunks = chunk("", 500, 50).expect("chunk");
    assert!(chunks.is_empty());
}

#[test]
fn short_text_yields_single_short_chunk() {
    let chunks = chunk("hello", 500, 50).expect("chunk");
    assert_eq!(chunks, vec!["hello".to_string()]);
}

#[test]
fn overlap_must_stay_below_chunk_size() {
    match chunk("some text", 50, 50) {
        Err(Error::InvalidConfig(msg)) => assert!(msg.contains("overlap")),
        other => panic!("expected InvalidConfig, got: {other:?}"),
    }
}

#[test]
fn chunking_is_deterministic() {
    let text: String = "abcdefghij".repeat(77);
    let a = chunk(&text, 130, 25).expect("chunk");
    let b = chunk(&text, 130, 25).expect("chunk");
    assert_eq!(a, b);
}

#[test]
fn document_chunks_carry_source_and_ordinals() {
    let config = ChunkingConfig {
        chunk_size: 40,
        overlap: 8,
    };
    let text: String = "lorem ipsum dolor sit amet ".repeat(10);
    let chunks = chunk_document("manual.pdf", &text, &config).expect("chunk_document");

    assert!(chunks.len() > 1);
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.ordinal, i, "ordinals follow window order");
        assert_eq!(c.source, "manual.pdf");
    }
}

#[test]
fn default_config_matches_reference_parameters() {
    let config = ChunkingConfig::default();
    assert_eq!(config.chunk_size, 500);
    assert_eq!(config.overlap, 50);
    assert!(config.validate().is_ok());
}
