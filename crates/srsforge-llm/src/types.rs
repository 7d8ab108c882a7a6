//! Core types for the completion backend abstraction.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use srsforge_utils::error::LlmError;

/// Input to one completion call.
///
/// This is the whole request contract: prompt text, a model identifier,
/// sampling temperature, and an output length cap. Backends translate it
/// into their own wire shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// How long the backend may wait for a response.
    pub timeout: Duration,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature: 0.2,
            max_tokens: 4000,
            timeout: Duration::from_secs(120),
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Result of one completion call.
///
/// Deliberately a single text blob: the pipeline never inspects response
/// structure beyond "it is a string". Each backend adapts its provider's
/// response shape into this type, keeping the rest of the system
/// backend-agnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
}

impl Completion {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A completion collaborator.
///
/// Implementations are injected into stages at construction; nothing in
/// the pipeline looks a client up from ambient scope.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Submit one completion request and await the full response.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Transport` for HTTP/decode failures and
    /// `LlmError::Misconfiguration` when the backend cannot be used as
    /// configured.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError>;
}
