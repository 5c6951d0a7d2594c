//! Configuration for retrieval and the remote OpenAI-compatible services.
//!
//! Credentials are always supplied by the caller or read from the
//! environment; nothing here carries a built-in key.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MiniRagError, Result};

/// The default OpenAI-compatible API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The default chat-completion model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// The default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Dimensionality of [`DEFAULT_EMBEDDING_MODEL`].
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the chat model.
pub const CHAT_MODEL_ENV: &str = "MINIRAG_CHAT_MODEL";
/// Environment variable overriding the embedding model.
pub const EMBEDDING_MODEL_ENV: &str = "MINIRAG_EMBEDDING_MODEL";

/// Retrieval parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Number of top results to return from vector search.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set the number of top results to return from vector search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`RetrievalConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::ConfigError`] if `top_k == 0`.
    pub fn build(self) -> Result<RetrievalConfig> {
        if self.config.top_k == 0 {
            return Err(MiniRagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

fn required_key(api_key: String) -> Result<String> {
    if api_key.trim().is_empty() {
        return Err(MiniRagError::ConfigError("API key must not be empty".to_string()));
    }
    Ok(api_key)
}

fn key_from_env() -> Result<String> {
    let key = std::env::var(API_KEY_ENV).map_err(|_| {
        MiniRagError::ConfigError(format!("{API_KEY_ENV} environment variable not set"))
    })?;
    required_key(key)
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
}

/// Settings for an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct ChatConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// API base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl ChatConfig {
    /// Create a config for the default endpoint and model.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::ConfigError`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: required_key(api_key.into())?,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Read `OPENAI_API_KEY`, and optionally `OPENAI_BASE_URL` and
    /// `MINIRAG_CHAT_MODEL`, from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::ConfigError`] if the key is missing or empty.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(key_from_env()?)?
            .with_base_url(env_or(BASE_URL_ENV, DEFAULT_BASE_URL))
            .with_model(env_or(CHAT_MODEL_ENV, DEFAULT_CHAT_MODEL)))
    }

    /// Point at an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings for an OpenAI-compatible embeddings endpoint.
#[derive(Clone)]
pub struct EmbeddingConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// API base URL; `/embeddings` is appended.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Matryoshka dimension override passed to the API, if any.
    pub dimensions: Option<usize>,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl EmbeddingConfig {
    /// Create a config for the default endpoint and model.
    ///
    /// Unlike [`ChatConfig::new`] an empty key is accepted here; the provider
    /// reports it as unavailable when constructed.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read `OPENAI_API_KEY`, and optionally `OPENAI_BASE_URL` and
    /// `MINIRAG_EMBEDDING_MODEL`, from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::ConfigError`] if the key is missing or empty.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(key_from_env()?)
            .with_base_url(env_or(BASE_URL_ENV, DEFAULT_BASE_URL))
            .with_model(env_or(EMBEDDING_MODEL_ENV, DEFAULT_EMBEDDING_MODEL)))
    }

    /// Point at an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Request truncated embeddings of this size.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The dimensionality the configured model will return.
    pub fn effective_dimensions(&self) -> usize {
        self.dimensions.unwrap_or(DEFAULT_EMBEDDING_DIMENSIONS)
    }
}

impl fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .field("timeout", &self.timeout)
            .finish()
    }
}
