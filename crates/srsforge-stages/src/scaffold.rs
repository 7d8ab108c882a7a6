//! Project initialization stage.

use std::sync::Arc;

use async_trait::async_trait;
use srsforge_runner::Provisioner;
use srsforge_stage_api::{ProjectLayout, Stage, StageId, StageOutcome};
use srsforge_state::PipelineState;
use srsforge_utils::error::PipelineError;
use tracing::debug;

/// Entry-point stub written to `app/main.py`.
const MAIN_PY: &str = r#"from fastapi import FastAPI

app = FastAPI()


@app.get("/")
async def root():
    return {"message": "Hello World"}
"#;

/// Baseline dependency manifest for the generated project.
const REQUIREMENTS_TXT: &str = "fastapi>=0.109.0\nuvicorn[standard]>=0.27.0\n";

/// Establishes the on-disk layout, the database instance, and the isolated
/// execution environment.
///
/// Three activities, sequential and unconditional: directory/file layout,
/// database bring-up, environment bring-up. The first failure aborts the
/// rest of the stage. Directory creation is idempotent.
pub struct ScaffoldStage {
    layout: ProjectLayout,
    provisioner: Arc<dyn Provisioner>,
}

impl ScaffoldStage {
    #[must_use]
    pub fn new(layout: ProjectLayout, provisioner: Arc<dyn Provisioner>) -> Self {
        Self {
            layout,
            provisioner,
        }
    }

    async fn create_layout(&self) -> Result<(), PipelineError> {
        for dir in self.layout.all_dirs() {
            tokio::fs::create_dir_all(&dir).await?;
        }

        tokio::fs::write(self.layout.app_dir().join("main.py"), MAIN_PY).await?;
        tokio::fs::write(
            self.layout.root().join("requirements.txt"),
            REQUIREMENTS_TXT,
        )
        .await?;

        debug!(root = %self.layout.root().display(), "Project layout created");
        Ok(())
    }

    async fn initialize(&self) -> Result<(), PipelineError> {
        self.create_layout().await?;

        self.provisioner
            .start_database()
            .await
            .map_err(|e| PipelineError::Transport(format!("database bring-up failed: {e}")))?;

        self.provisioner
            .create_environment(self.layout.root())
            .await
            .map_err(|e| PipelineError::Transport(format!("environment setup failed: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl Stage for ScaffoldStage {
    fn id(&self) -> StageId {
        StageId::Scaffold
    }

    async fn run(&self, mut state: PipelineState) -> StageOutcome {
        match self.initialize().await {
            Ok(()) => {
                state.log("Successfully initialized project structure");
                StageOutcome::new(state, StageId::Tests)
            }
            Err(e) => {
                state.error(format!("Project initialization error: {e}"));
                StageOutcome::new(state, StageId::Sink)
            }
        }
    }
}
