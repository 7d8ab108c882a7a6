//! Verification and repair stage.
//!
//! Runs the generated test suite, and on failure applies exactly one
//! LLM-driven repair pass before re-running. The cycle is an explicit
//! state machine: `Run → Repair → Rerun`, with `Done` and `Failed` as the
//! only exits.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use srsforge_llm::{CompletionRequest, LlmBackend};
use srsforge_runner::TestRunner;
use srsforge_stage_api::{ProjectLayout, Stage, StageId, StageOutcome};
use srsforge_state::PipelineState;
use srsforge_utils::error::PipelineError;
use tracing::{debug, info};

use crate::prompts;

const REPAIR_TEMPERATURE: f32 = 0.2;

/// Where the verify cycle stands. `Run → Repair → Rerun` on the failure
/// path; both `Run` and `Rerun` can reach `Done`, only `Rerun` can reach
/// `Failed`.
enum Cycle {
    Run,
    Repair { report: String },
    Rerun,
    Done { repaired: bool },
    Failed,
}

/// Verifies the generated project by running its test suite and repairing
/// failing test files once.
pub struct VerifyStage {
    backend: Arc<dyn LlmBackend>,
    runner: Arc<dyn TestRunner>,
    layout: ProjectLayout,
    model: String,
}

impl VerifyStage {
    #[must_use]
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        runner: Arc<dyn TestRunner>,
        layout: ProjectLayout,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            runner,
            layout,
            model: model.into(),
        }
    }

    async fn verify(&self) -> Result<bool, PipelineError> {
        let mut cycle = Cycle::Run;
        loop {
            cycle = match cycle {
                Cycle::Run => {
                    let outcome = self.runner.run_suite(&self.layout.tests_dir()).await?;
                    if outcome.passed {
                        Cycle::Done { repaired: false }
                    } else {
                        Cycle::Repair {
                            report: outcome.output,
                        }
                    }
                }
                Cycle::Repair { report } => {
                    info!("Found test failures, attempting fixes");
                    self.apply_repairs(&report).await?;
                    Cycle::Rerun
                }
                Cycle::Rerun => {
                    let outcome = self.runner.run_suite(&self.layout.tests_dir()).await?;
                    if outcome.passed {
                        Cycle::Done { repaired: true }
                    } else {
                        Cycle::Failed
                    }
                }
                Cycle::Done { repaired } => return Ok(repaired),
                Cycle::Failed => {
                    return Err(PipelineError::RepairExhausted(
                        "unable to fix all test failures after one repair cycle".to_string(),
                    ));
                }
            };
        }
    }

    /// One repair per distinct failing file: read it, ask for a corrected
    /// version given the failure report, overwrite it.
    async fn apply_repairs(&self, report: &str) -> Result<(), PipelineError> {
        for file in failing_test_files(report, &self.layout.tests_dir()) {
            let current = tokio::fs::read_to_string(&file).await?;
            let request =
                CompletionRequest::new(prompts::repair_prompt(report, &current), &self.model)
                    .with_temperature(REPAIR_TEMPERATURE);
            let fixed = self.backend.complete(request).await?.text;
            tokio::fs::write(&file, fixed).await?;
            debug!(file = %file.display(), "Repair applied");
        }
        Ok(())
    }
}

#[async_trait]
impl Stage for VerifyStage {
    fn id(&self) -> StageId {
        StageId::Verify
    }

    async fn run(&self, mut state: PipelineState) -> StageOutcome {
        match self.verify().await {
            Ok(false) => {
                state.log("All tests passed successfully");
                StageOutcome::new(state, StageId::Complete)
            }
            Ok(true) => {
                state.log("Successfully fixed all test failures");
                StageOutcome::new(state, StageId::Complete)
            }
            Err(e) => {
                state.error(format!("Debugging error: {e}"));
                StageOutcome::new(state, StageId::Sink)
            }
        }
    }
}

/// Extract the failing test files from a verbose pytest report.
///
/// A failure line carries `FAILED` and a `path::testname` reference; the
/// path component is taken from the last whitespace-separated token before
/// the first `::`, normalized against `test_root` (a leading `tests/` or
/// `tests\` is stripped before re-joining, preserving any subdirectory).
/// Returned paths are de-duplicated, first occurrence order preserved.
#[must_use]
pub fn failing_test_files(report: &str, test_root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for line in report.lines() {
        let line = line.trim();
        if !line.contains("FAILED") || !line.contains("::") {
            continue;
        }
        let Some(before) = line.split("::").next() else {
            continue;
        };
        let Some(token) = before.split_whitespace().last() else {
            continue;
        };

        let relative = token
            .strip_prefix("tests/")
            .or_else(|| token.strip_prefix("tests\\"))
            .unwrap_or(token);
        let path = test_root.join(relative);
        if !files.contains(&path) {
            files.push(path);
        }
    }
    files
}
