//! Answer synthesis: fixed instruction template + completion call.

use crate::completion::CompletionModel;

/// The instruction template constrains the model to the retrieved
/// context and tells it to decline when the answer is absent.
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "Answer the question using only the context below. If it is not in the context, \
         say you don't know.\n\nContext:\n{context}\n\nQuestion: {question}"
    )
}

/// Produce an answer grounded in `context_chunks` (order preserved, one
/// chunk per line).
///
/// This is the one boundary that degrades instead of erroring: a
/// completion failure becomes a readable message string so a bad
/// upstream call never crashes the serving loop.
pub async fn synthesize(
    model: &dyn CompletionModel,
    question: &str,
    context_chunks: &[String],
) -> String {
    let context = context_chunks.join("\n");
    let prompt = build_prompt(question, &context);
    match model.complete(&prompt).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(error = %e, "completion failed, degrading to message");
            format!("Error generating answer: {e}")
        }
    }
}
