//! HTTP backend for OpenAI-compatible chat-completion APIs.
//!
//! Groq exposes this wire shape natively; any other OpenAI-compatible
//! endpoint works by overriding the base URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use srsforge_config::Config;
use srsforge_utils::error::LlmError;
use tracing::debug;

use crate::types::{Completion, CompletionRequest, LlmBackend};

/// Default Groq API base URL.
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Backend for `{base_url}/chat/completions` endpoints.
pub struct OpenAiCompatBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    provider: &'static str,
}

impl OpenAiCompatBackend {
    /// Create a backend with an explicit key and base URL.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be
    /// constructed.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        provider: &'static str,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            provider,
        })
    }

    /// Create a backend from configuration, reading the API key from the
    /// configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the key variable is unset,
    /// or if `openai-compat` is selected without a `base_url`.
    pub fn new_from_config(config: &Config, provider: &'static str) -> Result<Self, LlmError> {
        let api_key_env = config.llm.api_key_env();
        let api_key = std::env::var(api_key_env).map_err(|_| {
            LlmError::Misconfiguration(format!(
                "API key not found in environment variable '{api_key_env}'. \
                 Set this variable or configure a different api_key_env in [llm]."
            ))
        })?;

        let base_url = config.llm.base_url.clone();
        if provider == "openai-compat" && base_url.is_none() {
            return Err(LlmError::Misconfiguration(
                "provider 'openai-compat' requires [llm] base_url to be set".to_string(),
            ));
        }

        Self::new(api_key, base_url, provider)
    }
}

#[async_trait]
impl LlmBackend for OpenAiCompatBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        debug!(
            provider = self.provider,
            model = %request.model,
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            timeout_secs = request.timeout.as_secs(),
            "Invoking completion backend"
        );

        let body = ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Transport(format!("completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LlmError::Transport(format!(
                "completion request returned HTTP {status}: {}",
                detail.chars().take(512).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to decode completion response: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                LlmError::Transport("completion response contained no choices".to_string())
            })?;

        debug!(provider = self.provider, chars = text.len(), "Completion received");

        Ok(Completion::new(text))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
