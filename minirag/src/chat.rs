//! Chat-completion answer synthesis over an OpenAI-compatible API.
//!
//! This module is only available when the `openai` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::ChatConfig;
use crate::error::{MiniRagError, Result};
use crate::synthesizer::{ResponseSynthesizer, build_prompt};

/// A [`ResponseSynthesizer`] that sends one `/chat/completions` request per answer.
///
/// The request carries a single user message holding the prompt from
/// [`build_prompt`]. There is no retry or streaming; the configured timeout
/// bounds the whole round trip.
///
/// # Example
///
/// ```rust,ignore
/// use minirag::{ChatCompletionSynthesizer, ChatConfig, ResponseSynthesizer};
///
/// let synthesizer = ChatCompletionSynthesizer::new(ChatConfig::from_env()?)?;
/// let answer = synthesizer.answer("What is it?", &snippets).await?;
/// ```
pub struct ChatCompletionSynthesizer {
    client: reqwest::Client,
    config: ChatConfig,
    endpoint: String,
}

impl ChatCompletionSynthesizer {
    /// Build the HTTP client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::ConfigError`] if the HTTP client cannot be created.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MiniRagError::ConfigError(format!("failed to build HTTP client: {e}")))?;
        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        Ok(Self { client, config, endpoint })
    }

    /// The model requests are sent to.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

// ── Chat completion request/response types ─────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── ResponseSynthesizer implementation ─────────────────────────────

#[async_trait]
impl ResponseSynthesizer for ChatCompletionSynthesizer {
    async fn answer(&self, question: &str, context: &[String]) -> Result<String> {
        let prompt = build_prompt(question, context);
        debug!(
            model = %self.config.model,
            context_len = context.len(),
            prompt_len = prompt.len(),
            "requesting chat completion"
        );

        let request_body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage { role: "user", content: &prompt }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %self.endpoint, error = %e, "request failed");
                let kind = if e.is_timeout() { "request timed out" } else { "request failed" };
                MiniRagError::ApiError(format!("{kind}: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let code = status.as_u16();
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(e) => format!("API returned {code}: {} (body: {body})", e.error.message),
                Err(_) => format!("API returned {code}: {body}"),
            };

            error!(%status, "chat completion API error");
            return Err(MiniRagError::ApiError(message));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse response");
            MiniRagError::ApiError(format!("failed to parse response: {e}"))
        })?;

        let answer = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| MiniRagError::ApiError("response contained no completion".to_string()))?;

        info!(model = %self.config.model, answer_len = answer.len(), "chat completion received");
        Ok(answer)
    }
}
