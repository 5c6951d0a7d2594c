//! Test doubles for the remote collaborators.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{MiniRagError, Result};
use crate::synthesizer::{ResponseSynthesizer, build_prompt};

/// A [`ResponseSynthesizer`] that returns a fixed answer and remembers the
/// prompts it was asked to answer.
#[derive(Debug, Default)]
pub struct StaticSynthesizer {
    answer: String,
    prompts: Mutex<Vec<String>>,
}

impl StaticSynthesizer {
    /// Always reply with `answer`.
    pub fn new(answer: impl Into<String>) -> Self {
        Self { answer: answer.into(), prompts: Mutex::new(Vec::new()) }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ResponseSynthesizer for StaticSynthesizer {
    async fn answer(&self, question: &str, context: &[String]) -> Result<String> {
        self.prompts
            .lock()
            .map_err(|_| MiniRagError::ApiError("prompt log poisoned".to_string()))?
            .push(build_prompt(question, context));
        Ok(self.answer.clone())
    }
}
