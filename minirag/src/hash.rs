//! Deterministic, offline embeddings via token feature hashing.
//!
//! [`HashEmbeddingProvider`] needs no model or network access. Texts that
//! share words land near each other, which is enough for demos, tests, and
//! small keyword-heavy corpora.

use async_trait::async_trait;
use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::error::{MiniRagError, Result};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// An [`EmbeddingProvider`] that hashes lowercase word tokens into a fixed
/// number of signed buckets and L2-normalizes the result.
///
/// The same text always yields the same vector. Input with no alphanumeric
/// tokens cannot be embedded.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl HashEmbeddingProvider {
    /// Create a provider producing `dimensions`-long vectors.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::ConfigError`] if `dimensions` is zero.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(MiniRagError::ConfigError(
                "hash embedding dimensions must be greater than zero".to_string(),
            ));
        }
        Ok(Self { dimensions })
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()).map(str::to_lowercase)
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0f32; self.dimensions];
        let mut token_count = 0usize;

        for token in tokens(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimensions as u64) as usize;
            // High bit picks the sign so unrelated collisions tend to cancel.
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
            token_count += 1;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if token_count == 0 || norm == 0.0 {
            return Err(MiniRagError::VectorizationFailed {
                provider: self.name().to_string(),
                message: "text contains no embeddable tokens".to_string(),
            });
        }
        embedding.iter_mut().for_each(|x| *x /= norm);

        debug!(provider = self.name(), token_count, "hashed text into embedding");
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "Hash"
    }
}
