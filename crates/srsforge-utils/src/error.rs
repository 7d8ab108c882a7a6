//! Error taxonomy for the generation pipeline.
//!
//! Three families of errors exist, matching who produces them:
//!
//! - [`PipelineError`] — the stage-level taxonomy. Stages catch every
//!   failure themselves, convert it into one of these, append the rendered
//!   message to the state's error log, and route to the sink. Pipeline
//!   errors never cross the orchestrator boundary as `Err` values.
//! - [`LlmError`] — failures of the completion collaborator (construction
//!   or invocation).
//! - [`RunnerError`] — failures of external process collaborators (test
//!   execution, provisioning).
//!
//! Collaborator errors fold into `PipelineError::Transport` via `From`, so
//! stage code can use `?` internally and still end up with the documented
//! three-variant taxonomy in the state's error log.

use thiserror::Error;

/// Stage-level error taxonomy.
///
/// | Variant | Meaning | Retried? |
/// |---------|---------|----------|
/// | `Validation` | malformed/missing input before any external call | no |
/// | `Transport` | an external call failed (LLM, subprocess, file I/O) | only via the single repair cycle |
/// | `RepairExhausted` | checks still fail after the one repair cycle | no, fatal |
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Repair exhausted: {0}")]
    RepairExhausted(String),
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<RunnerError> for PipelineError {
    fn from(err: RunnerError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Errors from the LLM completion collaborator.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Backend configuration is invalid (missing API key, missing model).
    #[error("LLM misconfiguration: {0}")]
    Misconfiguration(String),

    /// The completion call itself failed (HTTP error, malformed response).
    #[error("LLM transport failure: {0}")]
    Transport(String),

    /// The requested provider is not supported.
    #[error("{0}")]
    Unsupported(String),
}

/// Errors from external process collaborators.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The process could not be spawned at all.
    #[error("failed to spawn '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    /// The process ran but reported failure where success was required.
    #[error("'{program}' failed: {detail}")]
    CommandFailed { program: String, detail: String },

    /// The process exceeded its allotted time.
    #[error("'{program}' timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    /// Reading captured output failed.
    #[error("failed to capture output of '{program}': {reason}")]
    OutputCapture { program: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_errors_fold_into_transport() {
        let llm = LlmError::Transport("connection reset".to_string());
        let pipeline: PipelineError = llm.into();
        assert!(matches!(pipeline, PipelineError::Transport(_)));
        assert!(pipeline.to_string().starts_with("Transport error:"));

        let runner = RunnerError::SpawnFailed {
            program: "podman".to_string(),
            reason: "not found".to_string(),
        };
        let pipeline: PipelineError = runner.into();
        assert!(pipeline.to_string().contains("podman"));
    }

    #[test]
    fn taxonomy_messages_name_their_category() {
        assert!(
            PipelineError::Validation("Empty SRS content".to_string())
                .to_string()
                .contains("Validation")
        );
        assert!(
            PipelineError::RepairExhausted("still failing".to_string())
                .to_string()
                .contains("Repair exhausted")
        );
    }
}
