use async_trait::async_trait;

use askdocs_core::chunker::{chunk_document, ChunkingConfig};
use askdocs_core::error::{Error, Result};
use askdocs_core::traits::Embedder;
use askdocs_embed::FakeEmbedder;
use askdocs_index::FlatIndex;
use askdocs_rag::completion::CompletionModel;
use askdocs_rag::retriever::Retriever;
use askdocs_rag::{synthesizer, QaEngine};

/// Echoes the full prompt back, so tests can assert on the context that
/// reached the collaborator.
struct EchoCompletion;

#[async_trait]
impl CompletionModel for EchoCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

struct FailingCompletion;

#[async_trait]
impl CompletionModel for FailingCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(Error::Completion("service unavailable".to_string()))
    }
}

struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn dim(&self) -> usize {
        8
    }
    fn max_len(&self) -> usize {
        256
    }
    fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::Embedding("model offline".to_string()))
    }
}

/// A two-page document whose only statement about water storage sits in
/// the third sliding window (chars ~1000-1140 of ~2000).
fn two_page_document() -> String {
    let mut text = String::new();
    while text.len() < 1000 {
        text.push_str("Garden rotation notes cover compost beds and seasonal planting cycles. ");
    }
    text.push_str("The emergency water reserve holds exactly forty liters per person. ");
    while text.len() < 2000 {
        text.push_str("Fence maintenance requires tension checks and post inspection each spring. ");
    }
    text
}

fn build_retriever() -> Retriever {
    let text = two_page_document();
    let chunks = chunk_document("guide.pdf", &text, &ChunkingConfig::default()).expect("chunk");
    assert_eq!(chunks.len(), 5, "reference document splits into 5 chunks");

    let embedder = FakeEmbedder::new(256);
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embedder.embed_batch(&texts).expect("embed");
    let index = FlatIndex::build(&vectors).expect("build");
    Retriever::new(Box::new(embedder), index, chunks).expect("retriever")
}

#[test]
fn answer_chunk_surfaces_in_top_3() {
    let retriever = build_retriever();
    let hits = retriever
        .retrieve("How many liters does the emergency water reserve hold per person?", 3)
        .expect("retrieve");

    assert_eq!(hits.len(), 3);
    assert!(
        hits.iter().any(|h| h.text.contains("forty liters")),
        "the chunk carrying the answer ranks in the top 3"
    );
    assert!(hits.iter().all(|h| h.source == "guide.pdf"));
    for pair in hits.windows(2) {
        assert!(pair[0].distance <= pair[1].distance, "closest first");
    }
}

#[test]
fn retrieve_clamps_k_to_indexed_count() {
    let retriever = build_retriever();
    let hits = retriever.retrieve("water reserve", 50).expect("retrieve");
    assert_eq!(hits.len(), 5, "k beyond the indexed count clamps silently");
}

#[test]
fn retriever_rejects_misaligned_metadata() {
    let embedder = FakeEmbedder::new(64);
    let vectors = embedder
        .embed_batch(&["alpha".to_string(), "bravo".to_string()])
        .expect("embed");
    let index = FlatIndex::build(&vectors).expect("build");

    match Retriever::new(Box::new(embedder), index, Vec::new()) {
        Err(Error::CorruptIndex(_)) => {}
        other => panic!("expected CorruptIndex, got: {other:?}"),
    }
}

#[tokio::test]
async fn end_to_end_answer_contains_expected_substring() {
    let engine = QaEngine::new(build_retriever(), Box::new(EchoCompletion));
    let answer = engine
        .ask("How many liters does the emergency water reserve hold per person?", 3)
        .await;

    // The echo stub returns the prompt, which embeds the retrieved context.
    assert!(answer.text.contains("forty liters"));
    assert_eq!(answer.evidence.len(), 3);
}

#[tokio::test]
async fn completion_failure_degrades_to_message() {
    let engine = QaEngine::new(build_retriever(), Box::new(FailingCompletion));
    let answer = engine.ask("anything about water?", 3).await;

    assert!(
        answer.text.contains("Error generating answer"),
        "failure is a readable string, not a crash: {}",
        answer.text
    );
}

#[tokio::test]
async fn retrieval_failure_yields_empty_results_not_a_crash() {
    let embedder = FakeEmbedder::new(64);
    let vectors = embedder.embed_batch(&["only entry".to_string()]).expect("embed");
    let index = FlatIndex::build(&vectors).expect("build");
    let chunks = vec![askdocs_core::types::DocumentChunk {
        text: "only entry".to_string(),
        source: "doc.pdf".to_string(),
        ordinal: 0,
    }];
    let retriever = Retriever::new(Box::new(FailingEmbedder), index, chunks).expect("retriever");

    let engine = QaEngine::new(retriever, Box::new(EchoCompletion));
    let answer = engine.ask("anything", 3).await;
    assert!(answer.evidence.is_empty());
    assert!(answer.text.contains("No results"));
}

#[tokio::test]
async fn synthesize_joins_context_in_order() {
    let chunks = vec!["first block".to_string(), "second block".to_string()];
    let answer = synthesizer::synthesize(&EchoCompletion, "q?", &chunks).await;

    let first = answer.find("first block").expect("first present");
    let second = answer.find("second block").expect("second present");
    assert!(first < second, "context order is preserved");
}
