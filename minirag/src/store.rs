//! In-memory vector store using cosine similarity.
//!
//! [`VectorStore`] holds one read-only [`Corpus`] and answers top-K queries
//! with a linear scan. The corpus is replaced wholesale by
//! [`load`](VectorStore::load) and never mutated by a search.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{MiniRagError, Result};
use crate::record::{Corpus, SearchResult};

/// Compute cosine similarity between two vectors.
///
/// Sums run in `f64`, which holds the square of any finite `f32` without
/// overflow or underflow. Returns 0.0 if either vector has zero magnitude or
/// contains a non-finite component. Extra trailing components of the longer
/// vector are ignored, so callers must check lengths first.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let similarity = dot / (norm_a * norm_b);
    if !similarity.is_finite() {
        return 0.0;
    }
    similarity.clamp(-1.0, 1.0) as f32
}

/// A corpus of embedded documents searchable by cosine similarity.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use minirag::{HashEmbeddingProvider, VectorStore};
///
/// let mut store = VectorStore::new().with_embedder(Arc::new(HashEmbeddingProvider::new(256)?));
/// store.load("corpus.json")?;
/// let results = store.search("what is minirag?", 3).await?;
/// ```
#[derive(Default)]
pub struct VectorStore {
    corpus: Option<Corpus>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl VectorStore {
    /// Create a store with no corpus and no embedding provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store around an already validated corpus.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::LoadError`] if the corpus fails validation.
    pub fn from_corpus(corpus: Corpus) -> Result<Self> {
        let mut store = Self::new();
        store.set_corpus(corpus)?;
        Ok(store)
    }

    /// Attach the provider used to embed queries.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// The currently held corpus, if one has been loaded.
    pub fn corpus(&self) -> Option<&Corpus> {
        self.corpus.as_ref()
    }

    /// Number of records held; zero when no corpus is loaded.
    pub fn len(&self) -> usize {
        self.corpus.as_ref().map_or(0, Corpus::len)
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the held corpus after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::LoadError`] if validation fails; the previous
    /// corpus is kept in that case.
    pub fn set_corpus(&mut self, corpus: Corpus) -> Result<()> {
        corpus.validate()?;
        self.corpus = Some(corpus);
        Ok(())
    }

    /// Load a corpus file, replacing the held corpus only on success.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::LoadError`] if the file is unreadable or malformed.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&Corpus> {
        let corpus = Corpus::load(path)?;
        Ok(&*self.corpus.insert(corpus))
    }

    /// Embed `query` and return the `top_k` most similar records.
    ///
    /// Results are ordered by descending score; equal scores keep corpus
    /// order. A missing or empty corpus, or `top_k == 0`, yields no results.
    ///
    /// # Errors
    ///
    /// - [`MiniRagError::EmbeddingUnavailable`] if no provider is attached.
    /// - [`MiniRagError::VectorizationFailed`] if the provider cannot embed `query`.
    /// - [`MiniRagError::DimensionMismatch`] if the query vector's length
    ///   differs from the corpus dimensionality.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let embedder = self.embedder.as_ref().ok_or_else(|| {
            MiniRagError::EmbeddingUnavailable("no embedding provider configured".to_string())
        })?;

        if top_k == 0 || self.is_empty() {
            debug!(top_k, records = self.len(), "search skipped: nothing to rank");
            return Ok(Vec::new());
        }

        debug!(provider = embedder.name(), query_len = query.len(), "embedding query");
        let query_embedding = embedder.embed(query).await?;
        self.search_by_embedding(&query_embedding, top_k)
    }

    /// Rank the corpus against a precomputed query embedding.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::DimensionMismatch`] if `embedding` does not
    /// match the corpus dimensionality.
    pub fn search_by_embedding(
        &self,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let Some(corpus) = self.corpus.as_ref().filter(|c| !c.is_empty()) else {
            return Ok(Vec::new());
        };
        if top_k == 0 {
            return Ok(Vec::new());
        }

        if let Some(expected) = corpus.dimensions() {
            if expected != embedding.len() {
                return Err(MiniRagError::DimensionMismatch { expected, actual: embedding.len() });
            }
        }

        let mut scored: Vec<SearchResult> = corpus
            .records()
            .iter()
            .map(|record| SearchResult {
                id: record.id.clone(),
                content: record.content.clone(),
                score: cosine_similarity(embedding, &record.embedding),
            })
            .collect();

        // `sort_by` is stable, so ties stay in corpus order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);

        info!(records = corpus.len(), top_k, result_count = scored.len(), "search completed");
        Ok(scored)
    }
}
