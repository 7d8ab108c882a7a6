//! Scripted backend for tests.
//!
//! Returns queued responses in order and records every request it saw, so
//! tests can assert on call counts and prompt contents without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use srsforge_utils::error::LlmError;

use crate::types::{Completion, CompletionRequest, LlmBackend};

/// A backend that replays a fixed script of responses.
///
/// When the script runs dry, every further call returns the configured
/// fallback (default: a transport error), which keeps misbehaving tests
/// loud instead of silently looping.
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    exhausted_fallback: Option<String>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    #[must_use]
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a transport failure.
    #[must_use]
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Err(message.into()));
        self
    }

    /// After the script is exhausted, keep answering with `text` instead
    /// of erroring. Useful for stages that make a data-dependent number of
    /// calls.
    #[must_use]
    pub fn then_always(mut self, text: impl Into<String>) -> Self {
        self.exhausted_fallback = Some(text.into());
        self
    }

    /// Requests seen so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of completion calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        self.requests.lock().unwrap().push(request);

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(Completion::new(text)),
            Some(Err(message)) => Err(LlmError::Transport(message)),
            None => match &self.exhausted_fallback {
                Some(text) => Ok(Completion::new(text.clone())),
                None => Err(LlmError::Transport(
                    "scripted backend exhausted".to_string(),
                )),
            },
        }
    }
}
