//! OpenAI embedding provider using the OpenAI embeddings API.
//!
//! This module is only available when the `openai` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::EmbeddingConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{MiniRagError, Result};

const PROVIDER: &str = "OpenAI";

/// An [`EmbeddingProvider`] backed by an OpenAI-compatible `/embeddings` endpoint.
///
/// # Configuration
///
/// See [`EmbeddingConfig`]: model defaults to `text-embedding-3-small`, the
/// key comes from the caller or `OPENAI_API_KEY`, and `dimensions` is an
/// optional Matryoshka override.
///
/// # Example
///
/// ```rust,ignore
/// use minirag::{EmbeddingConfig, OpenAIEmbeddingProvider};
///
/// let provider = OpenAIEmbeddingProvider::new(EmbeddingConfig::from_env()?)?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    config: EmbeddingConfig,
    endpoint: String,
}

impl OpenAIEmbeddingProvider {
    /// Create a provider from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::EmbeddingUnavailable`] if the API key is empty
    /// or the HTTP client cannot be built.
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(MiniRagError::EmbeddingUnavailable(
                "OpenAI API key must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build().map_err(|e| {
            MiniRagError::EmbeddingUnavailable(format!("failed to build HTTP client: {e}"))
        })?;
        let endpoint = format!("{}/embeddings", config.base_url.trim_end_matches('/'));

        Ok(Self { client, config, endpoint })
    }

    /// Create a provider configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::EmbeddingUnavailable`] if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let config = EmbeddingConfig::from_env()
            .map_err(|e| MiniRagError::EmbeddingUnavailable(e.to_string()))?;
        Self::new(config)
    }

    fn failure(message: impl Into<String>) -> MiniRagError {
        MiniRagError::VectorizationFailed {
            provider: PROVIDER.to_string(),
            message: message.into(),
        }
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| Self::failure("API returned empty response"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(index) = texts.iter().position(|t| t.trim().is_empty()) {
            return Err(Self::failure(format!("input {index} is empty")));
        }

        debug!(
            provider = PROVIDER,
            batch_size = texts.len(),
            model = %self.config.model,
            "embedding batch"
        );

        let request_body = EmbeddingRequest {
            model: &self.config.model,
            input: texts.to_vec(),
            dimensions: self.config.dimensions,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                Self::failure(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(Self::failure(format!("API returned {status}: {detail}")));
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            Self::failure(format!("failed to parse response: {e}"))
        })?;

        if embedding_response.data.len() != texts.len() {
            return Err(Self::failure(format!(
                "API returned {} embeddings for {} inputs",
                embedding_response.data.len(),
                texts.len()
            )));
        }

        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.config.effective_dimensions()
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
