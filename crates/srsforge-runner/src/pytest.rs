//! Test-execution collaborator.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use srsforge_utils::error::RunnerError;
use tracing::info;

use crate::process::run_command;

/// Result of one test-suite execution: the pass/fail verdict plus the raw
/// textual report. The core parses the report with a lightweight pattern
/// match; no structured format is assumed.
#[derive(Debug, Clone)]
pub struct TestRunOutcome {
    pub passed: bool,
    pub output: String,
}

/// Collaborator that executes the generated test suite.
#[async_trait]
pub trait TestRunner: Send + Sync {
    /// Run the suite under `test_dir`.
    ///
    /// A failing suite is a successful run with `passed == false`; only
    /// the inability to execute at all is an `Err`.
    async fn run_suite(&self, test_dir: &Path) -> Result<TestRunOutcome, RunnerError>;
}

/// Runs the generated suite with `python -m pytest <dir> -v`.
#[derive(Debug, Clone)]
pub struct PytestRunner {
    python: String,
    timeout: Duration,
}

impl PytestRunner {
    #[must_use]
    pub fn new(python: impl Into<String>, timeout: Duration) -> Self {
        Self {
            python: python.into(),
            timeout,
        }
    }
}

#[async_trait]
impl TestRunner for PytestRunner {
    async fn run_suite(&self, test_dir: &Path) -> Result<TestRunOutcome, RunnerError> {
        let dir = test_dir.to_string_lossy();
        let output = run_command(
            &self.python,
            &["-m", "pytest", dir.as_ref(), "-v"],
            None,
            self.timeout,
        )
        .await?;

        info!(
            passed = output.exit_success,
            test_dir = %dir,
            "Test suite execution finished"
        );

        Ok(TestRunOutcome {
            passed: output.exit_success,
            output: output.merged(),
        })
    }
}
