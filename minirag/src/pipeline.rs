//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] composes a [`VectorStore`] (with its
//! [`EmbeddingProvider`]) and an optional [`ResponseSynthesizer`] into the
//! query-time workflow: embed → search → synthesize.
//!
//! # Example
//!
//! ```rust,ignore
//! use minirag::{Corpus, RagPipeline, RetrievalConfig};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RetrievalConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .corpus(Corpus::load("corpus.json")?)
//!     .synthesizer(Arc::new(synthesizer)) // optional
//!     .build()?;
//!
//! let answer = pipeline.ask("What does it cost?").await?;
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::config::RetrievalConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{MiniRagError, Result};
use crate::record::{Corpus, SearchResult};
use crate::store::VectorStore;
use crate::synthesizer::ResponseSynthesizer;

/// The outcome of [`RagPipeline::ask`].
#[derive(Debug, Clone, Serialize)]
pub struct RagAnswer {
    /// Retrieved records, most similar first.
    pub sources: Vec<SearchResult>,
    /// The synthesized answer, or `None` when no synthesizer is configured.
    pub answer: Option<String>,
}

/// Query-time RAG workflow over a loaded corpus.
pub struct RagPipeline {
    config: RetrievalConfig,
    store: VectorStore,
    synthesizer: Option<Arc<dyn ResponseSynthesizer>>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Return a reference to the underlying store.
    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Retrieve the configured `top_k` records for `question`.
    ///
    /// # Errors
    ///
    /// Propagates embedding and dimension errors from [`VectorStore::search`].
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        self.store.search(question, self.config.top_k).await.map_err(|e| {
            error!(error = %e, "retrieval failed");
            e
        })
    }

    /// Retrieve context for `question` and, if a synthesizer is configured,
    /// generate an answer from it.
    ///
    /// # Errors
    ///
    /// Any retrieval error, or [`MiniRagError::ApiError`] from the synthesizer.
    pub async fn ask(&self, question: &str) -> Result<RagAnswer> {
        let sources = self.retrieve(question).await?;

        let answer = match &self.synthesizer {
            Some(synthesizer) => {
                let context: Vec<String> = sources.iter().map(|r| r.content.clone()).collect();
                let answer = synthesizer.answer(question, &context).await.map_err(|e| {
                    error!(error = %e, "answer synthesis failed");
                    e
                })?;
                Some(answer)
            }
            None => None,
        };

        info!(source_count = sources.len(), answered = answer.is_some(), "question handled");
        Ok(RagAnswer { sources, answer })
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `embedding_provider` and `corpus` are required; `config` defaults to
/// [`RetrievalConfig::default`] and `synthesizer` is optional.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RetrievalConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    corpus: Option<Corpus>,
    synthesizer: Option<Arc<dyn ResponseSynthesizer>>,
}

impl RagPipelineBuilder {
    /// Set the retrieval configuration.
    pub fn config(mut self, config: RetrievalConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider used for queries.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the corpus to search.
    pub fn corpus(mut self, corpus: Corpus) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Set an optional synthesizer for answer generation.
    pub fn synthesizer(mut self, synthesizer: Arc<dyn ResponseSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::ConfigError`] if a required field is missing,
    /// or [`MiniRagError::LoadError`] if the corpus fails validation.
    pub fn build(self) -> Result<RagPipeline> {
        let embedding_provider = self.embedding_provider.ok_or_else(|| {
            MiniRagError::ConfigError("embedding_provider is required".to_string())
        })?;
        let corpus =
            self.corpus.ok_or_else(|| MiniRagError::ConfigError("corpus is required".to_string()))?;

        let store = VectorStore::from_corpus(corpus)?.with_embedder(embedding_provider);

        Ok(RagPipeline {
            config: self.config.unwrap_or_default(),
            store,
            synthesizer: self.synthesizer,
        })
    }
}
