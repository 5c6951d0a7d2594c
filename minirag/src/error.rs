//! Error types for the `minirag` crate.

use thiserror::Error;

/// Errors that can occur while building, loading, searching, or answering.
#[derive(Debug, Error)]
pub enum MiniRagError {
    /// No embedding provider is configured, or it could not be initialized.
    #[error("Embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The embedding provider could not produce a vector for the given text.
    #[error("Vectorization failed ({provider}): {message}")]
    VectorizationFailed {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The corpus source is unreadable, malformed, or internally inconsistent.
    #[error("Corpus load error: {0}")]
    LoadError(String),

    /// A query or record embedding does not match the corpus dimensionality.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimensionality held by the corpus.
        expected: usize,
        /// The dimensionality that was supplied.
        actual: usize,
    },

    /// The remote text-generation request failed or returned a non-success status.
    #[error("API error: {0}")]
    ApiError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error while writing a corpus.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for `minirag` operations.
pub type Result<T> = std::result::Result<T, MiniRagError>;
