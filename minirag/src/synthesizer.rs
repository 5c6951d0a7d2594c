//! Answer synthesis from retrieved context.

use std::fmt::Write;

use async_trait::async_trait;

use crate::error::Result;

/// Instruction placed at the top of every synthesis prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. Answer the question using only \
the information in the context below. If the context does not contain the answer, say that you \
do not know. Reply in the same language as the question.";

/// Produces a natural-language answer to a question given retrieved snippets.
#[async_trait]
pub trait ResponseSynthesizer: Send + Sync {
    /// Answer `question` using `context`, which is ordered most relevant first.
    ///
    /// Fails with [`ApiError`](crate::MiniRagError::ApiError) when the
    /// backing service cannot produce an answer.
    async fn answer(&self, question: &str, context: &[String]) -> Result<String>;
}

/// Render the single prompt sent to the generation service.
///
/// ```
/// let prompt = minirag::build_prompt("Why?", &["Because.".to_string()]);
/// assert!(prompt.contains("1. Because."));
/// assert!(prompt.ends_with("Answer:"));
/// ```
pub fn build_prompt(question: &str, context: &[String]) -> String {
    let context_len: usize = context.iter().map(String::len).sum();
    let mut prompt =
        String::with_capacity(SYSTEM_INSTRUCTION.len() + question.len() + context_len + 64);
    prompt.push_str(SYSTEM_INSTRUCTION);
    prompt.push_str("\n\nContext:\n");

    if context.is_empty() {
        prompt.push_str("(no context available)\n");
    }
    for (i, snippet) in context.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(prompt, "{}. {}", i + 1, snippet.trim());
    }

    let _ = write!(prompt, "\nQuestion: {}\n\nAnswer:", question.trim());
    prompt
}
