//! Standard pipeline wiring.
//!
//! The realized graph is the linear chain with a guarded sink shortcut
//! out of every working stage:
//!
//! ```text
//! requirements → scaffold → tests → code → verify → complete
//!       \___________\________\_______\_______\→ sink
//! ```

use std::sync::Arc;

use srsforge_engine::{GraphBuilder, GraphError, StageGraph, routed_to};
use srsforge_extraction::DocumentExtractor;
use srsforge_llm::LlmBackend;
use srsforge_runner::{Provisioner, TestRunner};
use srsforge_stage_api::{ProjectLayout, StageId};
use srsforge_stages::{
    CodeGenStage, CompleteStage, RequirementsStage, ScaffoldStage, SinkStage, TestGenStage,
    VerifyStage,
};

/// Everything the standard pipeline needs injected. Production wiring and
/// test wiring differ only in which implementations land here.
pub struct PipelineDeps {
    pub backend: Arc<dyn LlmBackend>,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub provisioner: Arc<dyn Provisioner>,
    pub runner: Arc<dyn TestRunner>,
    pub layout: ProjectLayout,
    pub model: String,
    pub max_tokens: u32,
}

/// Build the standard five-stage graph from the given collaborators.
///
/// # Errors
///
/// Returns `GraphError` if the wiring below ever references an
/// unregistered stage; with the fixed wiring this cannot happen, but the
/// builder validates regardless.
pub fn standard_graph(deps: PipelineDeps) -> Result<StageGraph, GraphError> {
    let PipelineDeps {
        backend,
        extractor,
        provisioner,
        runner,
        layout,
        model,
        max_tokens,
    } = deps;

    GraphBuilder::new()
        .stage(Arc::new(RequirementsStage::new(
            Arc::clone(&backend),
            extractor,
            model.clone(),
            max_tokens,
        )))
        .stage(Arc::new(ScaffoldStage::new(layout.clone(), provisioner)))
        .stage(Arc::new(TestGenStage::new(
            Arc::clone(&backend),
            layout.clone(),
            model.clone(),
        )))
        .stage(Arc::new(CodeGenStage::new(
            Arc::clone(&backend),
            layout.clone(),
            model.clone(),
        )))
        .stage(Arc::new(VerifyStage::new(backend, runner, layout, model)))
        .stage(Arc::new(CompleteStage))
        .stage(Arc::new(SinkStage))
        .entry(StageId::Requirements)
        .edge_if(StageId::Requirements, StageId::Sink, routed_to(StageId::Sink))
        .edge(StageId::Requirements, StageId::Scaffold)
        .edge_if(StageId::Scaffold, StageId::Sink, routed_to(StageId::Sink))
        .edge(StageId::Scaffold, StageId::Tests)
        .edge_if(StageId::Tests, StageId::Sink, routed_to(StageId::Sink))
        .edge(StageId::Tests, StageId::Code)
        .edge_if(StageId::Code, StageId::Sink, routed_to(StageId::Sink))
        .edge(StageId::Code, StageId::Verify)
        .edge_if(StageId::Verify, StageId::Sink, routed_to(StageId::Sink))
        .edge(StageId::Verify, StageId::Complete)
        .build()
}
