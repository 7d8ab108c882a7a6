//! Terminal stages: the error sink and the success completion marker.

use async_trait::async_trait;
use srsforge_stage_api::{Stage, StageId, StageOutcome};
use srsforge_state::PipelineState;
use tracing::error;

/// Observational error terminal. Surfaces every accumulated error at
/// error level and records that the run halted; never recovers, never
/// routes anywhere (the graph gives it no outgoing edges).
#[derive(Debug, Clone, Copy, Default)]
pub struct SinkStage;

#[async_trait]
impl Stage for SinkStage {
    fn id(&self) -> StageId {
        StageId::Sink
    }

    async fn run(&self, mut state: PipelineState) -> StageOutcome {
        for entry in &state.errors {
            error!(%entry, "Pipeline error");
        }
        state.log(format!(
            "Pipeline halted: {} error(s) recorded",
            state.errors.len()
        ));
        StageOutcome::new(state, StageId::Sink)
    }
}

/// Success terminal: one summary log entry, then the run ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompleteStage;

#[async_trait]
impl Stage for CompleteStage {
    fn id(&self) -> StageId {
        StageId::Complete
    }

    async fn run(&self, mut state: PipelineState) -> StageOutcome {
        state.log("Pipeline completed successfully");
        StageOutcome::new(state, StageId::Complete)
    }
}
