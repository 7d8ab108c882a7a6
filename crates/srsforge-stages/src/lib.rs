//! Concrete pipeline stages.
//!
//! Five working stages plus two terminals, all implementing the
//! [`Stage`](srsforge_stage_api::Stage) contract:
//!
//! - [`RequirementsStage`] — SRS text to structured requirements
//! - [`ScaffoldStage`] — project layout, database, execution environment
//! - [`TestGenStage`] — one pytest file per endpoint/model/auth descriptor
//! - [`CodeGenStage`] — models, routes, services
//! - [`VerifyStage`] — run the suite, repair once, re-run
//! - [`SinkStage`] / [`CompleteStage`] — terminals
//!
//! Every stage catches its own failures, appends one error entry, and
//! routes to the sink; `Err` never crosses the orchestrator boundary.

mod codegen;
mod prompts;
mod requirements;
mod scaffold;
mod terminal;
mod testgen;
mod verify;

pub use codegen::CodeGenStage;
pub use requirements::RequirementsStage;
pub use scaffold::ScaffoldStage;
pub use terminal::{CompleteStage, SinkStage};
pub use testgen::TestGenStage;
pub use verify::{VerifyStage, failing_test_files};
