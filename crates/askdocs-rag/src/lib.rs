//! Retrieval-augmented question answering over a prebuilt index.

pub mod completion;
pub mod retriever;
pub mod synthesizer;

use askdocs_core::types::ScoredChunk;

use crate::completion::CompletionModel;
use crate::retriever::Retriever;

/// An answer plus the evidence chunks it was grounded on.
#[derive(Debug)]
pub struct Answer {
    pub text: String,
    pub evidence: Vec<ScoredChunk>,
}

/// Application context assembled once at startup: retriever plus the
/// completion collaborator. Both sit behind traits so tests inject
/// stubs instead of live services.
pub struct QaEngine {
    retriever: Retriever,
    completion: Box<dyn CompletionModel>,
}

impl QaEngine {
    pub fn new(retriever: Retriever, completion: Box<dyn CompletionModel>) -> Self {
        Self {
            retriever,
            completion,
        }
    }

    /// Retrieve evidence for `question` and synthesize an answer from it.
    ///
    /// Retrieval failures are caught here and rendered as an
    /// empty-evidence answer, so one bad question never stops the
    /// serving loop.
    pub async fn ask(&self, question: &str, k: usize) -> Answer {
        let evidence = match self.retriever.retrieve(question, k) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, "retrieval failed");
                Vec::new()
            }
        };
        if evidence.is_empty() {
            return Answer {
                text: "No results found for your query.".to_string(),
                evidence,
            };
        }
        let context: Vec<String> = evidence.iter().map(|c| c.text.clone()).collect();
        let text = synthesizer::synthesize(self.completion.as_ref(), question, &context).await;
        Answer { text, evidence }
    }
}
