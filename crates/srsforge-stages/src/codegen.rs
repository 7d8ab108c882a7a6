//! Application code generation stage.

use std::sync::Arc;

use async_trait::async_trait;
use srsforge_llm::{CompletionRequest, LlmBackend};
use srsforge_stage_api::{ProjectLayout, Stage, StageId, StageOutcome};
use srsforge_state::{PipelineState, Requirements};
use srsforge_utils::error::PipelineError;
use tracing::debug;

use crate::prompts;
use crate::testgen::requirements_context;

const GENERATION_TEMPERATURE: f32 = 0.1;

/// Generates the application code in three sequential sub-phases: one
/// storage model per table, one route handler per endpoint, one service
/// class per table. Failure in any sub-phase aborts the stage.
pub struct CodeGenStage {
    backend: Arc<dyn LlmBackend>,
    layout: ProjectLayout,
    model: String,
}

impl CodeGenStage {
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

    async fn generate_models(
        &self,
        requirements: &Requirements,
        context: &str,
    ) -> Result<(), PipelineError> {
        tokio::fs::create_dir_all(self.layout.models_dir()).await?;
        for name in requirements.model_names() {
            let content = self.complete(prompts::model_code_prompt(name, context)).await?;
            let file = self
                .layout
                .models_dir()
                .join(format!("{}.py", name.to_lowercase()));
            tokio::fs::write(&file, content).await?;
            debug!(file = %file.display(), "Model code generated");
        }
        Ok(())
    }

    async fn generate_routes(
        &self,
        requirements: &Requirements,
        context: &str,
    ) -> Result<(), PipelineError> {
        tokio::fs::create_dir_all(self.layout.routes_dir()).await?;
        for endpoint in &requirements.api_endpoints {
            let content = self
                .complete(prompts::route_code_prompt(endpoint, context))
                .await?;
            let file = self
                .layout
                .routes_dir()
                .join(format!("{}.py", endpoint.resource_name()));
            tokio::fs::write(&file, content).await?;
            debug!(file = %file.display(), "Route code generated");
        }
        Ok(())
    }

    async fn generate_services(
        &self,
        requirements: &Requirements,
        context: &str,
    ) -> Result<(), PipelineError> {
        tokio::fs::create_dir_all(self.layout.services_dir()).await?;
        for name in requirements.model_names() {
            let content = self
                .complete(prompts::service_code_prompt(name, context))
                .await?;
            let file = self
                .layout
                .services_dir()
                .join(format!("{}_service.py", name.to_lowercase()));
            tokio::fs::write(&file, content).await?;
            debug!(file = %file.display(), "Service code generated");
        }
        Ok(())
    }

    async fn generate(&self, requirements: &Requirements) -> Result<(), PipelineError> {
        let context = requirements_context(requirements)?;
        self.generate_models(requirements, &context).await?;
        self.generate_routes(requirements, &context).await?;
        self.generate_services(requirements, &context).await?;
        Ok(())
    }
}

#[async_trait]
impl Stage for CodeGenStage {
    fn id(&self) -> StageId {
        StageId::Code
    }

    async fn run(&self, mut state: PipelineState) -> StageOutcome {
        let requirements = state.requirements_or_default();
        match self.generate(&requirements).await {
            Ok(()) => {
                state.log("Successfully generated application code");
                StageOutcome::new(state, StageId::Verify)
            }
            Err(e) => {
                state.error(format!("Code generation error: {e}"));
                StageOutcome::new(state, StageId::Sink)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srsforge_llm::ScriptedBackend;
    use srsforge_state::{DbSchema, EndpointSpec, TableSpec};

    fn requirements() -> Requirements {
        Requirements {
            functional_requirements: vec![],
            api_endpoints: vec![EndpointSpec {
                path: "/api/users".to_string(),
                method: "POST".to_string(),
                description: "Create new user".to_string(),
            }],
            db_schema: DbSchema {
                tables: vec![TableSpec {
                    name: "Users".to_string(),
                    fields: vec!["id".to_string()],
                }],
            },
            auth_requirements: Default::default(),
        }
    }

    fn state_with(requirements: Requirements) -> PipelineState {
        let mut state = PipelineState::new("srs");
        state.requirements = Some(requirements);
        state
    }

    #[tokio::test]
    async fn writes_model_route_and_service_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path().join("generated_api"));
        let backend = Arc::new(ScriptedBackend::new().then_always("# generated"));
        let stage = CodeGenStage::new(
            Arc::clone(&backend) as Arc<dyn LlmBackend>,
            layout.clone(),
            "test-model",
        );

        let outcome = stage.run(state_with(requirements())).await;

        assert_eq!(outcome.next, StageId::Verify);
        assert_eq!(
            outcome.state.logs,
            vec!["Successfully generated application code"]
        );
        assert!(layout.models_dir().join("users.py").is_file());
        assert!(layout.routes_dir().join("users.py").is_file());
        assert!(layout.services_dir().join("users_service.py").is_file());
        // 1 model + 1 route + 1 service
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn route_subphase_failure_keeps_model_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path().join("generated_api"));
        let stage = CodeGenStage::new(
            Arc::new(ScriptedBackend::new().respond("# model").fail("rate limited")),
            layout.clone(),
            "test-model",
        );

        let outcome = stage.run(state_with(requirements())).await;

        assert_eq!(outcome.next, StageId::Sink);
        assert!(outcome.state.errors[0].starts_with("Code generation error"));
        assert!(layout.models_dir().join("users.py").is_file());
        assert!(!layout.routes_dir().join("users.py").exists());
        assert!(!layout.services_dir().join("users_service.py").exists());
    }

    #[tokio::test]
    async fn empty_requirements_generate_nothing_but_still_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path().join("generated_api"));
        let backend = Arc::new(ScriptedBackend::new());
        let stage = CodeGenStage::new(
            Arc::clone(&backend) as Arc<dyn LlmBackend>,
            layout,
            "test-model",
        );

        let outcome = stage.run(state_with(Requirements::default())).await;

        assert_eq!(outcome.next, StageId::Verify);
        assert_eq!(backend.call_count(), 0);
    }
}
