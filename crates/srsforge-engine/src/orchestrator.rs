//! Pipeline run loop.

use std::time::Instant;

use srsforge_stage_api::StageId;
use srsforge_state::PipelineState;
use srsforge_utils::logging::stage_span;
use tracing::{Instrument, debug};

use crate::graph::{GraphError, StageGraph};

/// Result of one full pipeline run: the final state and the terminal
/// stage it ended at.
#[derive(Debug)]
pub struct PipelineReport {
    pub state: PipelineState,
    pub terminal: StageId,
}

impl PipelineReport {
    /// Whether the run ended at the success terminal with a clean state.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.terminal == StageId::Complete && !self.state.has_errors()
    }
}

/// Drives the state through the graph, one stage at a time.
///
/// The orchestrator owns the state for the lifetime of the run; each
/// stage borrows it for the duration of its call by taking it by value
/// and returning it in the outcome. Stage failures are data (error
/// entries, sink routing); only graph misconfiguration surfaces as `Err`.
pub struct PipelineOrchestrator {
    graph: StageGraph,
}

impl PipelineOrchestrator {
    #[must_use]
    pub fn new(graph: StageGraph) -> Self {
        Self { graph }
    }

    /// Run the pipeline to a terminal stage.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownStage` when a stage requests an
    /// unregistered successor, and `GraphError::NoMatchingEdge` when no
    /// edge out of a non-terminal stage accepts the outcome.
    pub async fn run(&self, state: PipelineState) -> Result<PipelineReport, GraphError> {
        let mut current = self.graph.entry();
        let mut state = state;

        loop {
            // Build validation guarantees the entry and every edge target
            // are registered, so a miss here is the same configuration
            // failure as an unknown successor.
            let stage = self.graph.stage(current).ok_or(GraphError::UnknownStage {
                from: current,
                returned: current,
            })?;

            let started = Instant::now();
            let outcome = stage
                .run(state)
                .instrument(stage_span(current.as_str()))
                .await;
            debug!(
                stage = %current,
                requested = %outcome.next,
                duration_ms = started.elapsed().as_millis() as u64,
                "Stage finished"
            );

            if !self.graph.is_registered(outcome.next) {
                return Err(GraphError::UnknownStage {
                    from: current,
                    returned: outcome.next,
                });
            }

            if self.graph.is_terminal(current) {
                return Ok(PipelineReport {
                    state: outcome.state,
                    terminal: current,
                });
            }

            let next = self.graph.select_successor(current, &outcome)?;
            state = outcome.state;
            current = next;
        }
    }
}
