//! The seam between text and vectors.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into fixed-length `f32` vectors.
///
/// Every vector a provider returns has exactly [`dimensions`](Self::dimensions)
/// components, and the corpus and the queries searched against it must come
/// from the same provider for scores to mean anything.
///
/// ```rust,ignore
/// let provider = HashEmbeddingProvider::new(256)?;
/// assert_eq!(provider.embed("hola").await?.len(), 256);
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text.
    ///
    /// Errors are [`VectorizationFailed`](crate::MiniRagError::VectorizationFailed).
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, one vector per input and in input order.
    ///
    /// Falls back to one [`embed`](Self::embed) call per text and gives up
    /// on the first error. The OpenAI provider overrides this with a single request.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Length of every vector this provider returns.
    fn dimensions(&self) -> usize;

    /// Label for log lines and the `provider` field of errors.
    fn name(&self) -> &str {
        "embedding"
    }
}
