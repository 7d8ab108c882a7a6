//! LLM completion collaborator for srsforge.
//!
//! One trait, [`LlmBackend`], with a single request/response contract:
//! `{prompt, model, temperature, max_tokens}` in, `{text}` out. The
//! orchestration core never sees provider wire formats; each backend is
//! the one adapter function between its provider and [`Completion`].

mod openai_compat;
mod types;

#[cfg(any(test, feature = "test-utils"))]
mod scripted;

pub use types::{Completion, CompletionRequest, LlmBackend};

#[cfg(any(test, feature = "test-utils"))]
pub use scripted::ScriptedBackend;

pub(crate) use openai_compat::OpenAiCompatBackend;

use srsforge_config::Config;
use srsforge_utils::error::LlmError;

/// Create a completion backend from configuration.
///
/// ## Supported Providers
///
/// - **`groq`** (default): Groq's OpenAI-compatible API
/// - **`openai-compat`**: any OpenAI-compatible endpoint; requires
///   `[llm] base_url`
///
/// # Errors
///
/// Returns `LlmError::Unsupported` for an unknown provider and
/// `LlmError::Misconfiguration` when provider configuration is invalid
/// (missing API key variable, missing base URL).
pub fn from_config(config: &Config) -> Result<Box<dyn LlmBackend>, LlmError> {
    let provider = config.llm.provider.as_deref().unwrap_or("groq");

    match provider {
        "groq" => {
            let backend = OpenAiCompatBackend::new_from_config(config, "groq")?;
            Ok(Box::new(backend))
        }
        "openai-compat" => {
            let backend = OpenAiCompatBackend::new_from_config(config, "openai-compat")?;
            Ok(Box::new(backend))
        }
        unknown => Err(LlmError::Unsupported(format!(
            "Unknown LLM provider '{unknown}'. Supported providers: groq, openai-compat."
        ))),
    }
}
