//! Offline corpus generation.
//!
//! [`VectorPreprocessor`] embeds raw documents one at a time. A document that
//! fails to embed is reported in [`PreprocessOutcome::skipped`] and the rest
//! of the batch carries on.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::embedding::EmbeddingProvider;
use crate::error::{MiniRagError, Result};
use crate::record::{Corpus, VectorRecord};

/// A document that was left out of the generated corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedDocument {
    /// Position of the document in the input sequence.
    pub index: usize,
    /// Why it was skipped.
    pub reason: String,
}

/// The records that were embedded plus the documents that were not.
#[derive(Debug, Clone, Default)]
pub struct PreprocessOutcome {
    /// Embedded documents in input order.
    pub corpus: Corpus,
    /// Documents that could not be embedded.
    pub skipped: Vec<SkippedDocument>,
}

impl PreprocessOutcome {
    /// Whether every input document made it into the corpus.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Turns raw documents into a [`Corpus`] using an [`EmbeddingProvider`].
pub struct VectorPreprocessor {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl VectorPreprocessor {
    /// Create a preprocessor backed by `embedder`.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// Embed every document, assigning each survivor a fresh UUID.
    ///
    /// Blank documents are skipped without calling the provider.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::DimensionMismatch`] if the provider returns
    /// vectors of differing lengths. Per-document embedding failures are
    /// not errors; they land in [`PreprocessOutcome::skipped`].
    pub async fn generate<S: AsRef<str>>(&self, documents: &[S]) -> Result<PreprocessOutcome> {
        let mut records = Vec::with_capacity(documents.len());
        let mut skipped = Vec::new();
        let mut dimensions: Option<usize> = None;

        for (index, document) in documents.iter().enumerate() {
            let text = document.as_ref();
            if text.trim().is_empty() {
                warn!(index, "skipping empty document");
                skipped.push(SkippedDocument { index, reason: "empty document".to_string() });
                continue;
            }

            let embedding = match self.embedder.embed(text).await {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!(index, provider = self.embedder.name(), error = %e, "skipping document");
                    skipped.push(SkippedDocument { index, reason: e.to_string() });
                    continue;
                }
            };

            match dimensions {
                Some(expected) if expected != embedding.len() => {
                    return Err(MiniRagError::DimensionMismatch {
                        expected,
                        actual: embedding.len(),
                    });
                }
                Some(_) => {}
                None => dimensions = Some(embedding.len()),
            }

            records.push(VectorRecord::new(Uuid::new_v4().to_string(), text, embedding));
        }

        info!(
            provider = self.embedder.name(),
            generated = records.len(),
            skipped = skipped.len(),
            "preprocessed documents"
        );

        Ok(PreprocessOutcome { corpus: Corpus::new(records), skipped })
    }

    /// [`generate`](Self::generate) and write the corpus to `path`.
    ///
    /// # Errors
    ///
    /// Any error from `generate`, or [`MiniRagError::Io`] if saving fails.
    pub async fn generate_and_save<S: AsRef<str>>(
        &self,
        documents: &[S],
        path: impl AsRef<Path>,
    ) -> Result<PreprocessOutcome> {
        let outcome = self.generate(documents).await?;
        outcome.corpus.save(path)?;
        Ok(outcome)
    }
}

/// Read raw documents from a file.
///
/// A `.json` file must hold an array of strings. Any other file is read as
/// one document per non-blank line.
///
/// # Errors
///
/// Returns [`MiniRagError::LoadError`] if the file is unreadable or a JSON
/// file is not an array of strings.
pub fn load_documents(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| MiniRagError::LoadError(format!("cannot read '{}': {e}", path.display())))?;

    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return serde_json::from_str(&text).map_err(|e| {
            MiniRagError::LoadError(format!(
                "'{}' is not a JSON array of strings: {e}",
                path.display()
            ))
        });
    }

    Ok(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect())
}
