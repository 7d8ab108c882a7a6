//! Test-suite generation stage.

use std::sync::Arc;

use async_trait::async_trait;
use srsforge_llm::{CompletionRequest, LlmBackend};
use srsforge_stage_api::{ProjectLayout, Stage, StageId, StageOutcome};
use srsforge_state::{PipelineState, Requirements};
use srsforge_utils::error::PipelineError;
use tracing::debug;

use crate::prompts;

/// Generated code wants determinism more than variety.
const GENERATION_TEMPERATURE: f32 = 0.1;

/// Generates one pytest file per endpoint, per data model, and one for the
/// auth descriptor when the SRS declared one.
///
/// Iteration is strictly sequential; the first failure aborts the stage
/// and earlier files stay on disk (no rollback).
pub struct TestGenStage {
    backend: Arc<dyn LlmBackend>,
    layout: ProjectLayout,
    model: String,
}

impl TestGenStage {
    #[must_use]
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        layout: ProjectLayout,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            layout,
            model: model.into(),
        }
    }

    async fn complete(&self, prompt: String) -> Result<String, PipelineError> {
        let request = CompletionRequest::new(prompt, &self.model)
            .with_temperature(GENERATION_TEMPERATURE);
        Ok(self.backend.complete(request).await?.text)
    }

    async fn generate(&self, requirements: &Requirements) -> Result<(), PipelineError> {
        let context = requirements_context(requirements)?;

        tokio::fs::create_dir_all(self.layout.route_tests_dir()).await?;
        tokio::fs::create_dir_all(self.layout.model_tests_dir()).await?;

        for endpoint in &requirements.api_endpoints {
            let content = self
                .complete(prompts::api_test_prompt(endpoint, &context))
                .await?;
            let file = self
                .layout
                .route_tests_dir()
                .join(format!("test_{}.py", endpoint.resource_name()));
            tokio::fs::write(&file, content).await?;
            debug!(file = %file.display(), "API test generated");
        }

        for name in requirements.model_names() {
            let content = self
                .complete(prompts::model_test_prompt(name, &context))
                .await?;
            let file = self
                .layout
                .model_tests_dir()
                .join(format!("test_{}.py", name.to_lowercase()));
            tokio::fs::write(&file, content).await?;
            debug!(file = %file.display(), "Model test generated");
        }

        if !requirements.auth_requirements.is_unspecified() {
            let auth_json = serde_json::to_string_pretty(&requirements.auth_requirements)
                .map_err(|e| PipelineError::Transport(e.to_string()))?;
            let content = self.complete(prompts::auth_test_prompt(&auth_json)).await?;
            let file = self.layout.tests_dir().join("test_auth.py");
            tokio::fs::write(&file, content).await?;
            debug!(file = %file.display(), "Auth test generated");
        }

        Ok(())
    }
}

#[async_trait]
impl Stage for TestGenStage {
    fn id(&self) -> StageId {
        StageId::Tests
    }

    async fn run(&self, mut state: PipelineState) -> StageOutcome {
        let requirements = state.requirements_or_default();
        match self.generate(&requirements).await {
            Ok(()) => {
                state.log("Successfully generated test cases");
                StageOutcome::new(state, StageId::Code)
            }
            Err(e) => {
                state.error(format!("Test generation error: {e}"));
                StageOutcome::new(state, StageId::Sink)
            }
        }
    }
}

/// The full requirements object, pretty-printed once per stage invocation
/// for embedding in per-item prompts.
pub(crate) fn requirements_context(requirements: &Requirements) -> Result<String, PipelineError> {
    serde_json::to_string_pretty(requirements).map_err(|e| PipelineError::Transport(e.to_string()))
}
