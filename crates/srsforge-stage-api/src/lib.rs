//! Stage trait system for the generation pipeline.
//!
//! This crate provides the shared contract between the orchestrator and
//! stage implementations. It contains the minimal types needed for stage
//! execution without introducing circular dependencies.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use srsforge_state::PipelineState;
pub use srsforge_utils::types::StageId;

/// What a stage hands back to the orchestrator: the (mutated) state and
/// the stage it wants to run next.
///
/// The requested successor is advisory; the graph's edges decide the
/// actual transition. A stage that detects a failure appends the error to
/// the state and requests [`StageId::Sink`].
#[derive(Debug)]
pub struct StageOutcome {
    pub state: PipelineState,
    pub next: StageId,
}

impl StageOutcome {
    #[must_use]
    pub fn new(state: PipelineState, next: StageId) -> Self {
        Self { state, next }
    }
}

/// Core trait every pipeline stage implements.
///
/// A stage takes the state by value, does its work, and returns the state
/// inside its outcome. Stages never return `Err`: every failure is caught,
/// recorded in `state.errors`, and expressed as a route to the sink. Each
/// invocation grows exactly one of `logs` or `errors`.
#[async_trait]
pub trait Stage: Send + Sync {
    /// The unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Execute the stage against the current state.
    async fn run(&self, state: PipelineState) -> StageOutcome;
}

/// Directory layout of the generated project.
///
/// All generated artifacts live under one root; stages derive every path
/// from here so the layout is defined in exactly one place.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn app_dir(&self) -> PathBuf {
        self.root.join("app")
    }

    #[must_use]
    pub fn models_dir(&self) -> PathBuf {
        self.app_dir().join("models")
    }

    #[must_use]
    pub fn services_dir(&self) -> PathBuf {
        self.app_dir().join("services")
    }

    #[must_use]
    pub fn api_dir(&self) -> PathBuf {
        self.app_dir().join("api")
    }

    #[must_use]
    pub fn routes_dir(&self) -> PathBuf {
        self.api_dir().join("routes")
    }

    #[must_use]
    pub fn tests_dir(&self) -> PathBuf {
        self.root.join("tests")
    }

    #[must_use]
    pub fn route_tests_dir(&self) -> PathBuf {
        self.tests_dir().join("test_routes")
    }

    #[must_use]
    pub fn model_tests_dir(&self) -> PathBuf {
        self.tests_dir().join("test_models")
    }

    /// Every directory the scaffold stage must create, parents first.
    #[must_use]
    pub fn all_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.app_dir(),
            self.models_dir(),
            self.services_dir(),
            self.api_dir(),
            self.routes_dir(),
            self.tests_dir(),
            self.route_tests_dir(),
            self.model_tests_dir(),
        ]
    }
}
