//! Requirements extraction stage.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use srsforge_extraction::{DocumentExtractor, ParsedRequirements, parse_completion};
use srsforge_llm::{CompletionRequest, LlmBackend};
use srsforge_stage_api::{Stage, StageId, StageOutcome};
use srsforge_state::{PipelineState, Requirements};
use srsforge_utils::error::PipelineError;
use tracing::{debug, warn};

use crate::prompts;

/// Sampling temperature for extraction. Low but not greedy: the prompt
/// pins the output shape, the temperature keeps phrasing stable.
const EXTRACTION_TEMPERATURE: f32 = 0.2;

/// Turns the raw SRS reference into structured [`Requirements`].
///
/// An empty reference is rejected before any external call. A `.docx`
/// reference is resolved through the document extractor; anything else is
/// treated as inline SRS text.
pub struct RequirementsStage {
    backend: Arc<dyn LlmBackend>,
    extractor: Arc<dyn DocumentExtractor>,
    model: String,
    max_tokens: u32,
}

impl RequirementsStage {
    #[must_use]
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        extractor: Arc<dyn DocumentExtractor>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            backend,
            extractor,
            model: model.into(),
            max_tokens,
        }
    }

    async fn extract(&self, source: &str) -> Result<ParsedRequirements, PipelineError> {
        if source.trim().is_empty() {
            return Err(PipelineError::Validation("Empty SRS content".to_string()));
        }

        let text = if source.ends_with(".docx") {
            self.extractor.extract_text(Path::new(source)).await?
        } else {
            source.to_string()
        };

        let request = CompletionRequest::new(prompts::requirements_prompt(&text), &self.model)
            .with_temperature(EXTRACTION_TEMPERATURE)
            .with_max_tokens(self.max_tokens);
        let completion = self.backend.complete(request).await?;

        Ok(parse_completion(&completion.text))
    }
}

#[async_trait]
impl Stage for RequirementsStage {
    fn id(&self) -> StageId {
        StageId::Requirements
    }

    async fn run(&self, mut state: PipelineState) -> StageOutcome {
        match self.extract(&state.source).await {
            Ok(parsed) => {
                match &parsed {
                    ParsedRequirements::Parsed(_) => {}
                    ParsedRequirements::Backfilled { missing, .. } => {
                        state.log(format!(
                            "Warning: Added missing keys in requirements: {}",
                            missing.join(", ")
                        ));
                    }
                    ParsedRequirements::Unparsable(_) => {
                        warn!("Completion response was not decodable; using the parse-failure sentinel");
                    }
                }
                let requirements: Requirements = parsed.into_requirements();
                debug!(
                    endpoints = requirements.api_endpoints.len(),
                    tables = requirements.db_schema.tables.len(),
                    "Requirements extracted"
                );
                state.requirements = Some(requirements);
                state.log("Successfully parsed SRS document");
                StageOutcome::new(state, StageId::Scaffold)
            }
            Err(e) => {
                state.error(format!("SRS parsing error: {e}"));
                StageOutcome::new(state, StageId::Sink)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srsforge_extraction::PlainTextExtractor;
    use srsforge_llm::ScriptedBackend;

    const WELL_FORMED: &str = concat!(
        r#"{"functional_requirements":["User registration"],"#,
        r#""api_endpoints":[],"db_schema":{"tables":[]},"#,
        r#""auth_requirements":{"type":"JWT","features":[]}}"#
    );

    fn stage(backend: ScriptedBackend) -> RequirementsStage {
        RequirementsStage::new(
            Arc::new(backend),
            Arc::new(PlainTextExtractor),
            "test-model",
            4000,
        )
    }

    #[tokio::test]
    async fn empty_source_fails_without_a_completion_call() {
        let backend = Arc::new(ScriptedBackend::new());
        let stage = RequirementsStage::new(
            Arc::clone(&backend) as Arc<dyn LlmBackend>,
            Arc::new(PlainTextExtractor),
            "test-model",
            4000,
        );

        let outcome = stage.run(PipelineState::new("   ")).await;
        assert_eq!(outcome.next, StageId::Sink);
        assert_eq!(outcome.state.errors.len(), 1);
        assert!(outcome.state.errors[0].to_lowercase().contains("empty"));
        assert!(outcome.state.logs.is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn noisy_but_complete_response_parses_without_warnings() {
        let stage = stage(
            ScriptedBackend::new().respond(format!("Sure! {WELL_FORMED} Let me know.")),
        );
        let outcome = stage.run(PipelineState::new("some srs text")).await;

        assert_eq!(outcome.next, StageId::Scaffold);
        assert_eq!(outcome.state.logs, vec!["Successfully parsed SRS document"]);
        assert!(outcome.state.errors.is_empty());
        let req = outcome.state.requirements.unwrap();
        assert_eq!(req.functional_requirements, vec!["User registration"]);
        assert_eq!(req.auth_requirements.auth_type, "JWT");
    }

    #[tokio::test]
    async fn missing_keys_backfill_with_one_warning() {
        let stage = stage(ScriptedBackend::new().respond(r#"{"api_endpoints":[]}"#));
        let outcome = stage.run(PipelineState::new("srs")).await;

        assert_eq!(outcome.next, StageId::Scaffold);
        assert_eq!(outcome.state.logs.len(), 2);
        assert_eq!(
            outcome.state.logs[0],
            "Warning: Added missing keys in requirements: functional_requirements, db_schema, auth_requirements"
        );
        assert!(outcome.state.requirements.is_some());
    }

    #[tokio::test]
    async fn undecodable_response_yields_the_sentinel_not_an_error() {
        let stage = stage(ScriptedBackend::new().respond("no json here"));
        let outcome = stage.run(PipelineState::new("srs")).await;

        assert_eq!(outcome.next, StageId::Scaffold);
        assert!(outcome.state.errors.is_empty());
        let req = outcome.state.requirements.unwrap();
        assert_eq!(
            req.functional_requirements,
            vec!["Failed to parse requirements"]
        );
    }

    #[tokio::test]
    async fn transport_failure_routes_to_the_sink() {
        let stage = stage(ScriptedBackend::new().fail("connection refused"));
        let outcome = stage.run(PipelineState::new("srs")).await;

        assert_eq!(outcome.next, StageId::Sink);
        assert_eq!(outcome.state.errors.len(), 1);
        assert!(outcome.state.errors[0].contains("connection refused"));
        assert!(outcome.state.logs.is_empty());
    }
}
