//! Provisioning collaborator: database container and isolated execution
//! environment for the generated project.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use srsforge_utils::error::RunnerError;
use tracing::info;

use crate::process::run_command;

/// Timeout for each provisioning command.
const PROVISION_TIMEOUT: Duration = Duration::from_secs(300);

/// Collaborator that brings up ancillary resources for the generated
/// project. Both activities are invoked once per run, sequentially, by
/// the scaffold stage; each must be retry-safe for the operator.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Bring up the database instance backing the generated service.
    async fn start_database(&self) -> Result<(), RunnerError>;

    /// Create an isolated execution environment under `project_root` with
    /// the project's declared dependencies installed.
    async fn create_environment(&self, project_root: &Path) -> Result<(), RunnerError>;
}

/// Production provisioner: podman postgres container plus a Python venv
/// with the generated `requirements.txt` installed.
#[derive(Debug, Clone)]
pub struct PodmanProvisioner {
    database_image: String,
    python: String,
}

impl PodmanProvisioner {
    #[must_use]
    pub fn new(database_image: impl Into<String>, python: impl Into<String>) -> Self {
        Self {
            database_image: database_image.into(),
            python: python.into(),
        }
    }

    fn expect_success(program: &str, output: &crate::CommandOutput) -> Result<(), RunnerError> {
        if output.exit_success {
            Ok(())
        } else {
            Err(RunnerError::CommandFailed {
                program: program.to_string(),
                detail: output.stderr.trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl Provisioner for PodmanProvisioner {
    async fn start_database(&self) -> Result<(), RunnerError> {
        let output = run_command(
            "podman",
            &[
                "run",
                "-d",
                "--name",
                "postgres_db",
                "-e",
                "POSTGRES_USER=postgres",
                "-e",
                "POSTGRES_PASSWORD=postgres",
                "-p",
                "5432:5432",
                &self.database_image,
            ],
            None,
            PROVISION_TIMEOUT,
        )
        .await?;
        Self::expect_success("podman", &output)?;

        info!(image = %self.database_image, "Database container started");
        Ok(())
    }

    async fn create_environment(&self, project_root: &Path) -> Result<(), RunnerError> {
        let venv = project_root.join("venv");
        let venv_str = venv.to_string_lossy();

        let output = run_command(
            &self.python,
            &["-m", "venv", venv_str.as_ref()],
            None,
            PROVISION_TIMEOUT,
        )
        .await?;
        Self::expect_success(&self.python, &output)?;

        let pip = venv.join("bin").join("pip");
        let requirements = project_root.join("requirements.txt");
        let output = run_command(
            &pip.to_string_lossy(),
            &["install", "-r", requirements.to_string_lossy().as_ref()],
            None,
            PROVISION_TIMEOUT,
        )
        .await?;
        Self::expect_success("pip", &output)?;

        info!(root = %project_root.display(), "Execution environment ready");
        Ok(())
    }
}

/// No-op provisioner for dry runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvisioner;

#[async_trait]
impl Provisioner for NullProvisioner {
    async fn start_database(&self) -> Result<(), RunnerError> {
        Ok(())
    }

    async fn create_environment(&self, _project_root: &Path) -> Result<(), RunnerError> {
        Ok(())
    }
}
