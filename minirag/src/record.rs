//! Data types for stored vectors, corpora, and search results.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MiniRagError, Result};

/// A document's text paired with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// The original document text.
    pub content: String,
    /// The vector embedding for `content`.
    pub embedding: Vec<f32>,
}

impl VectorRecord {
    /// Create a record from its parts.
    pub fn new(id: impl Into<String>, content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self { id: id.into(), content: content.into(), embedding }
    }
}

/// A retrieved record's content paired with its cosine similarity score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// The ID of the matching [`VectorRecord`].
    pub id: String,
    /// The content of the matching record.
    pub content: String,
    /// Cosine similarity to the query, in `[-1, 1]`.
    pub score: f32,
}

/// An ordered collection of [`VectorRecord`]s.
///
/// Serialized as a bare JSON array of records. Order carries no meaning for
/// search beyond breaking ties between equal scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Corpus {
    records: Vec<VectorRecord>,
}

impl Corpus {
    /// Wrap an existing list of records without validating it.
    pub fn new(records: Vec<VectorRecord>) -> Self {
        Self { records }
    }

    /// The records in corpus order.
    pub fn records(&self) -> &[VectorRecord] {
        &self.records
    }

    /// Consume the corpus, returning its records.
    pub fn into_records(self) -> Vec<VectorRecord> {
        self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The shared embedding dimensionality, or `None` for an empty corpus.
    pub fn dimensions(&self) -> Option<usize> {
        self.records.first().map(|r| r.embedding.len())
    }

    /// Check that every embedding has the same nonzero length and that ids are unique.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::LoadError`] naming the first offending record.
    pub fn validate(&self) -> Result<()> {
        let Some(dimensions) = self.dimensions() else {
            return Ok(());
        };
        if dimensions == 0 {
            return Err(MiniRagError::LoadError(format!(
                "record '{}' has an empty embedding",
                self.records[0].id
            )));
        }

        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if record.embedding.len() != dimensions {
                return Err(MiniRagError::LoadError(format!(
                    "record '{}' has {} dimensions, expected {dimensions}",
                    record.id,
                    record.embedding.len()
                )));
            }
            if !seen.insert(record.id.as_str()) {
                return Err(MiniRagError::LoadError(format!("duplicate record id '{}'", record.id)));
            }
        }
        Ok(())
    }
}

impl FromIterator<VectorRecord> for Corpus {
    fn from_iter<I: IntoIterator<Item = VectorRecord>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_corpus_is_valid_and_dimensionless() {
        let corpus = Corpus::default();
        assert!(corpus.validate().is_ok());
        assert_eq!(corpus.dimensions(), None);
        assert!(corpus.is_empty());
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let corpus = Corpus::new(vec![
            VectorRecord::new("a", "first", vec![1.0, 0.0]),
            VectorRecord::new("b", "second", vec![1.0, 0.0, 0.0]),
        ]);
        let err = corpus.validate().unwrap_err();
        assert!(matches!(err, MiniRagError::LoadError(ref msg) if msg.contains("'b'")));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let corpus = Corpus::new(vec![
            VectorRecord::new("a", "first", vec![1.0, 0.0]),
            VectorRecord::new("a", "second", vec![0.0, 1.0]),
        ]);
        assert!(matches!(corpus.validate(), Err(MiniRagError::LoadError(_))));
    }

    #[test]
    fn zero_length_embeddings_are_rejected() {
        let corpus = Corpus::new(vec![VectorRecord::new("a", "first", vec![])]);
        assert!(matches!(corpus.validate(), Err(MiniRagError::LoadError(_))));
    }
}
