//! # minirag
//!
//! Minimal retrieval-augmented generation.
//!
//! ## Overview
//!
//! - [`VectorPreprocessor`] embeds raw documents once and produces a [`Corpus`]
//!   that is saved as JSON.
//! - [`VectorStore`] loads a corpus, embeds a question with an
//!   [`EmbeddingProvider`], and ranks every record by cosine similarity.
//! - [`ResponseSynthesizer`] turns a question plus the top records into an
//!   answer; [`ChatCompletionSynthesizer`] does this over an
//!   OpenAI-compatible chat API.
//! - [`RagPipeline`] ties retrieval and synthesis together.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use minirag::{HashEmbeddingProvider, VectorPreprocessor, VectorStore};
//!
//! let embedder = Arc::new(HashEmbeddingProvider::new(256)?);
//! let outcome = VectorPreprocessor::new(embedder.clone())
//!     .generate_and_save(&documents, "corpus.json")
//!     .await?;
//!
//! let mut store = VectorStore::new().with_embedder(embedder);
//! store.load("corpus.json")?;
//! for hit in store.search("how much does it cost?", 3).await? {
//!     println!("{:.3} {}", hit.score, hit.content);
//! }
//! ```
//!
//! ## Features
//!
//! - `openai` (default): [`OpenAIEmbeddingProvider`] and [`ChatCompletionSynthesizer`].

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod hash;
pub mod mock;
pub mod pipeline;
pub mod preprocess;
pub mod record;
pub mod store;
pub mod synthesizer;

#[cfg(feature = "openai")]
pub mod chat;
#[cfg(feature = "openai")]
pub mod openai;

pub use config::{ChatConfig, EmbeddingConfig, RetrievalConfig, RetrievalConfigBuilder};
pub use embedding::EmbeddingProvider;
pub use error::{MiniRagError, Result};
pub use hash::HashEmbeddingProvider;
pub use mock::StaticSynthesizer;
pub use pipeline::{RagAnswer, RagPipeline, RagPipelineBuilder};
pub use preprocess::{PreprocessOutcome, SkippedDocument, VectorPreprocessor, load_documents};
pub use record::{Corpus, SearchResult, VectorRecord};
pub use store::{VectorStore, cosine_similarity};
pub use synthesizer::{ResponseSynthesizer, SYSTEM_INSTRUCTION, build_prompt};

#[cfg(feature = "openai")]
pub use chat::ChatCompletionSynthesizer;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
