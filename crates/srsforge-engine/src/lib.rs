//! Stage graph and run loop.
//!
//! [`GraphBuilder`] wires registered stages into a [`StageGraph`] with a
//! single entry and guarded edges; [`PipelineOrchestrator`] drives the
//! state through it until a terminal stage. Stage-level failures are data
//! in the state; only graph misconfiguration comes back as [`GraphError`].

mod graph;
mod orchestrator;

pub use graph::{GraphBuilder, GraphError, Guard, StageGraph, routed_to};
pub use orchestrator::{PipelineOrchestrator, PipelineReport};
