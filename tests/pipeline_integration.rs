//! End-to-end pipeline runs against scripted collaborators.
//!
//! Wires the standard graph with fakes for every external seam (LLM,
//! test runner, provisioner) and drives full runs through the
//! orchestrator, asserting on final routing, state logs/errors, and the
//! files left on disk.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use srsforge::cli::{PipelineDeps, standard_graph};
use srsforge::{
    NullProvisioner, PipelineOrchestrator, PipelineReport, PipelineState, PlainTextExtractor,
    ProjectLayout, Provisioner, RunnerError, StageId, TestRunOutcome, TestRunner,
};
use srsforge_llm::ScriptedBackend;

const WELL_FORMED: &str = concat!(
    r#"{"functional_requirements":["User registration"],"#,
    r#""api_endpoints":[{"path":"/api/users","method":"POST","description":"Create new user"}],"#,
    r#""db_schema":{"tables":[{"name":"users","fields":["id","email"]}]},"#,
    r#""auth_requirements":{"type":"JWT","features":["RBAC"]}}"#
);

const EMPTY_SHAPE: &str = concat!(
    r#"{"functional_requirements":[],"api_endpoints":[],"#,
    r#""db_schema":{"tables":[]},"auth_requirements":{"type":"Unknown","features":[]}}"#
);

/// Replays a fixed sequence of suite outcomes and counts invocations.
struct ScriptedRunner {
    outcomes: Mutex<Vec<TestRunOutcome>>,
    calls: Mutex<usize>,
}

impl ScriptedRunner {
    fn new(outcomes: Vec<(bool, &str)>) -> Self {
        Self {
            outcomes: Mutex::new(
                outcomes
                    .into_iter()
                    .rev()
                    .map(|(passed, output)| TestRunOutcome {
                        passed,
                        output: output.to_string(),
                    })
                    .collect(),
            ),
            calls: Mutex::new(0),
        }
    }

    fn always_passing() -> Self {
        Self::new(vec![])
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TestRunner for ScriptedRunner {
    async fn run_suite(&self, _test_dir: &Path) -> Result<TestRunOutcome, RunnerError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self
            .outcomes
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(TestRunOutcome {
                passed: true,
                output: "all passed".to_string(),
            }))
    }
}

struct FailingDatabaseProvisioner;

#[async_trait]
impl Provisioner for FailingDatabaseProvisioner {
    async fn start_database(&self) -> Result<(), RunnerError> {
        Err(RunnerError::SpawnFailed {
            program: "podman".to_string(),
            reason: "executable not found".to_string(),
        })
    }

    async fn create_environment(&self, _project_root: &Path) -> Result<(), RunnerError> {
        Ok(())
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    layout: ProjectLayout,
    backend: Arc<ScriptedBackend>,
    runner: Arc<ScriptedRunner>,
}

impl Fixture {
    fn new(backend: ScriptedBackend, runner: ScriptedRunner) -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self {
            layout: ProjectLayout::new(dir.path().join("generated_api")),
            _dir: dir,
            backend: Arc::new(backend),
            runner: Arc::new(runner),
        }
    }

    async fn run(&self, source: &str) -> PipelineReport {
        self.run_with_provisioner(source, Arc::new(NullProvisioner))
            .await
    }

    async fn run_with_provisioner(
        &self,
        source: &str,
        provisioner: Arc<dyn Provisioner>,
    ) -> PipelineReport {
        let graph = standard_graph(PipelineDeps {
            backend: Arc::clone(&self.backend) as Arc<dyn srsforge::LlmBackend>,
            extractor: Arc::new(PlainTextExtractor::new()),
            provisioner,
            runner: Arc::clone(&self.runner) as Arc<dyn TestRunner>,
            layout: self.layout.clone(),
            model: "test-model".to_string(),
            max_tokens: 4000,
        })
        .unwrap();

        PipelineOrchestrator::new(graph)
            .run(PipelineState::new(source))
            .await
            .unwrap()
    }

    fn test_files(&self) -> Vec<std::path::PathBuf> {
        let mut files = Vec::new();
        let root = self.layout.tests_dir();
        if !root.exists() {
            return files;
        }
        let mut pending = vec![root];
        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    files.push(path);
                }
            }
        }
        files
    }
}

// Scenario: empty source reference.
#[tokio::test]
async fn empty_source_errors_without_any_completion_call() {
    let fixture = Fixture::new(ScriptedBackend::new(), ScriptedRunner::always_passing());

    let report = fixture.run("").await;

    assert_eq!(report.terminal, StageId::Sink);
    assert_eq!(report.state.errors.len(), 1);
    assert!(report.state.errors[0].to_lowercase().contains("empty"));
    assert_eq!(fixture.backend.call_count(), 0);
    assert!(!report.succeeded());
}

// Scenario: the embedded object survives surrounding noise with no warnings.
#[tokio::test]
async fn noisy_completion_extracts_the_embedded_object_exactly() {
    let backend = ScriptedBackend::new()
        .respond(format!("noise {EMPTY_SHAPE} trailing"))
        .then_always("# generated");
    let fixture = Fixture::new(backend, ScriptedRunner::always_passing());

    let report = fixture.run("some srs text").await;

    assert_eq!(report.terminal, StageId::Complete);
    let requirements = report.state.requirements.as_ref().unwrap();
    assert!(requirements.functional_requirements.is_empty());
    assert!(requirements.api_endpoints.is_empty());
    assert!(requirements.db_schema.tables.is_empty());
    assert!(requirements.auth_requirements.is_unspecified());
    assert!(!report.state.logs.iter().any(|l| l.contains("Warning")));
    assert!(report.state.errors.is_empty());
}

#[tokio::test]
async fn full_run_generates_tests_and_code_then_completes() {
    let backend = ScriptedBackend::new()
        .respond(WELL_FORMED)
        .then_always("# generated");
    let fixture = Fixture::new(backend, ScriptedRunner::always_passing());

    let report = fixture.run("The system shall manage users.").await;

    assert_eq!(report.terminal, StageId::Complete);
    assert!(report.succeeded());
    assert_eq!(
        report.state.logs,
        vec![
            "Successfully parsed SRS document",
            "Successfully initialized project structure",
            "Successfully generated test cases",
            "Successfully generated application code",
            "All tests passed successfully",
            "Pipeline completed successfully",
        ]
    );

    let layout = &fixture.layout;
    assert!(layout.route_tests_dir().join("test_users.py").is_file());
    assert!(layout.model_tests_dir().join("test_users.py").is_file());
    assert!(layout.tests_dir().join("test_auth.py").is_file());
    assert!(layout.models_dir().join("users.py").is_file());
    assert!(layout.routes_dir().join("users.py").is_file());
    assert!(layout.services_dir().join("users_service.py").is_file());

    // 1 extraction + 3 test files + 3 code files, one suite execution.
    assert_eq!(fixture.backend.call_count(), 7);
    assert_eq!(fixture.runner.calls(), 1);
}

// Scenario: first suite run fails, one repair pass, second run passes.
#[tokio::test]
async fn failing_suite_is_repaired_once_then_passes() {
    let backend = ScriptedBackend::new()
        .respond(WELL_FORMED)
        .then_always("# regenerated");
    let failure_report = "\
FAILED tests/test_routes/test_users.py::test_create - AssertionError
FAILED tests/test_auth.py::test_login - AssertionError
";
    let runner = ScriptedRunner::new(vec![(false, failure_report), (true, "all passed")]);
    let fixture = Fixture::new(backend, runner);

    let report = fixture.run("srs").await;

    assert_eq!(report.terminal, StageId::Complete);
    assert!(report.state.errors.is_empty());
    assert_eq!(
        report
            .state
            .logs
            .iter()
            .filter(|l| l.contains("fixed"))
            .count(),
        1
    );
    assert_eq!(fixture.runner.calls(), 2);

    // Both named files were rewritten by the repair pass.
    let repaired = std::fs::read_to_string(
        fixture.layout.route_tests_dir().join("test_users.py"),
    )
    .unwrap();
    assert_eq!(repaired, "# regenerated");
    let repaired =
        std::fs::read_to_string(fixture.layout.tests_dir().join("test_auth.py")).unwrap();
    assert_eq!(repaired, "# regenerated");
}

// Scenario: the suite fails twice; the repair budget is one cycle.
#[tokio::test]
async fn persistent_failures_exhaust_the_repair_budget() {
    let backend = ScriptedBackend::new()
        .respond(WELL_FORMED)
        .then_always("# attempt");
    let failure_report = "FAILED tests/test_auth.py::test_login - AssertionError";
    let runner = ScriptedRunner::new(vec![(false, failure_report), (false, failure_report)]);
    let fixture = Fixture::new(backend, runner);

    let report = fixture.run("srs").await;

    assert_eq!(report.terminal, StageId::Sink);
    assert_eq!(report.state.errors.len(), 1);
    assert!(report.state.errors[0].contains("Repair exhausted"));
    // Two executions, never a third.
    assert_eq!(fixture.runner.calls(), 2);
}

// Scenario: layout succeeds but database bring-up fails.
#[tokio::test]
async fn database_failure_stops_the_run_before_test_generation() {
    let backend = ScriptedBackend::new()
        .respond(WELL_FORMED)
        .then_always("# should never be requested");
    let fixture = Fixture::new(backend, ScriptedRunner::always_passing());

    let report = fixture
        .run_with_provisioner("srs", Arc::new(FailingDatabaseProvisioner))
        .await;

    assert_eq!(report.terminal, StageId::Sink);
    assert_eq!(report.state.errors.len(), 1);
    assert!(report.state.errors[0].contains("database"));
    // Only the extraction completion happened; no test files were written.
    assert_eq!(fixture.backend.call_count(), 1);
    assert!(fixture.test_files().is_empty());
    assert_eq!(fixture.runner.calls(), 0);
}

// The sink surfaces every accumulated error and the run stops there.
#[tokio::test]
async fn sink_reports_errors_and_nothing_runs_after_it() {
    let fixture = Fixture::new(
        ScriptedBackend::new().fail("connection reset"),
        ScriptedRunner::always_passing(),
    );

    let report = fixture.run("srs").await;

    assert_eq!(report.terminal, StageId::Sink);
    assert!(report.state.errors[0].contains("connection reset"));
    assert!(
        report
            .state
            .logs
            .last()
            .unwrap()
            .contains("Pipeline halted")
    );
    // No scaffold, no generation, no verification.
    assert!(!fixture.layout.root().exists());
    assert_eq!(fixture.runner.calls(), 0);
}

// Missing top-level keys backfill with exactly one warning entry.
#[tokio::test]
async fn backfilled_keys_produce_one_warning_log() {
    let backend = ScriptedBackend::new()
        .respond(r#"{"api_endpoints":[]}"#)
        .then_always("# generated");
    let fixture = Fixture::new(backend, ScriptedRunner::always_passing());

    let report = fixture.run("srs").await;

    assert_eq!(report.terminal, StageId::Complete);
    let warnings: Vec<&String> = report
        .state
        .logs
        .iter()
        .filter(|l| l.starts_with("Warning: Added missing keys"))
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("functional_requirements, db_schema, auth_requirements"));
}
