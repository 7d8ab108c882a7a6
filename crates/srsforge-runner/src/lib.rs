//! External process collaborators.
//!
//! The pipeline core only needs success/failure plus captured text from
//! each external command; everything here hides the spawning details
//! behind two traits. All invocations are argv-style — no shell string
//! evaluation anywhere.

mod process;
mod provision;
mod pytest;

pub use process::{CommandOutput, run_command};
pub use provision::{NullProvisioner, PodmanProvisioner, Provisioner};
pub use pytest::{PytestRunner, TestRunOutcome, TestRunner};
