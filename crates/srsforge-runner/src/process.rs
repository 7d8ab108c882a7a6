//! Argv-style process execution with timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use srsforge_utils::error::RunnerError;
use tokio::process::Command;
use tracing::debug;

/// Captured output of one finished process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stdout and stderr concatenated, stdout first.
    #[must_use]
    pub fn merged(&self) -> String {
        let mut merged = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !merged.is_empty() && !merged.ends_with('\n') {
                merged.push('\n');
            }
            merged.push_str(&self.stderr);
        }
        merged
    }
}

/// Run `program` with `args`, capturing output.
///
/// Arguments are passed as discrete elements; shell metacharacters are
/// never interpreted. A non-zero exit status is not an error here — the
/// caller decides what failure means (a failing test suite is a result,
/// a failing `podman run` is not).
///
/// # Errors
///
/// Returns `RunnerError::SpawnFailed` when the program cannot start,
/// `RunnerError::Timeout` when it outlives `timeout` (the process is
/// killed), and `RunnerError::OutputCapture` when waiting on it fails.
pub async fn run_command(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<CommandOutput, RunnerError> {
    debug!(program, ?args, "Spawning external command");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
        program: program.to_string(),
        reason: e.to_string(),
    })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| RunnerError::OutputCapture {
            program: program.to_string(),
            reason: e.to_string(),
        })?,
        Err(_) => {
            // kill_on_drop reaps the child when the future is dropped.
            return Err(RunnerError::Timeout {
                program: program.to_string(),
                secs: timeout.as_secs(),
            });
        }
    };

    Ok(CommandOutput {
        exit_success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_of_a_real_process() {
        let output = run_command("echo", &["hello"], None, Duration::from_secs(10))
            .await
            .unwrap();
        assert!(output.exit_success);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn nonzero_exit_is_not_an_error() {
        let output = run_command("false", &[], None, Duration::from_secs(10))
            .await
            .unwrap();
        assert!(!output.exit_success);
    }

    #[tokio::test]
    async fn missing_program_is_spawn_failed() {
        let err = run_command(
            "srsforge-no-such-binary",
            &[],
            None,
            Duration::from_secs(10),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RunnerError::SpawnFailed { .. }));
    }

    #[tokio::test]
    async fn merged_output_keeps_stdout_first() {
        let output = CommandOutput {
            exit_success: false,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert_eq!(output.merged(), "out\nerr");
    }
}
