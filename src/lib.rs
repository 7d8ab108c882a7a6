//! srsforge — SRS-to-web-service generation pipeline.
//!
//! Feed it a Software Requirements Specification and it drives a
//! five-stage pipeline: requirements extraction, project initialization,
//! test-suite generation, code generation, and verification with a single
//! repair cycle. Stages pass one mutable [`PipelineState`] along a guarded
//! stage graph; failures accumulate as error entries and route to a
//! terminal sink instead of unwinding.
//!
//! This crate is the facade: the work lives in the `srsforge-*` member
//! crates, re-exported here for library consumers.

pub use srsforge_cli as cli;

pub use srsforge_config::Config;
pub use srsforge_engine::{
    GraphBuilder, GraphError, PipelineOrchestrator, PipelineReport, StageGraph, routed_to,
};
pub use srsforge_extraction::{
    DocumentExtractor, ParsedRequirements, PlainTextExtractor, parse_completion,
};
pub use srsforge_llm::{Completion, CompletionRequest, LlmBackend};
pub use srsforge_runner::{
    NullProvisioner, PodmanProvisioner, Provisioner, PytestRunner, TestRunOutcome, TestRunner,
};
pub use srsforge_stage_api::{ProjectLayout, Stage, StageId, StageOutcome};
pub use srsforge_stages::{
    CodeGenStage, CompleteStage, RequirementsStage, ScaffoldStage, SinkStage, TestGenStage,
    VerifyStage,
};
pub use srsforge_state::{PipelineState, Requirements};
pub use srsforge_utils::error::{LlmError, PipelineError, RunnerError};
pub use srsforge_utils::exit_codes::ExitCode;
