//! Pipeline state container and the extracted requirements model.
//!
//! [`PipelineState`] is the single mutable record threaded through every
//! stage of a run. The orchestrator owns it for the lifetime of the run;
//! each stage takes it by value and hands it back inside its outcome, so at
//! any instant exactly one party holds it and no locking is needed.

mod requirements;

pub use requirements::{
    AuthSpec, DbSchema, EndpointSpec, PARSE_FAILURE_SENTINEL, Requirements, TableSpec,
};

/// Mutable state for one pipeline run.
///
/// `logs` and `errors` are append-only and never reordered. A non-empty
/// `errors` vector means the run must route to the sink. Each stage
/// invocation grows exactly one of the two: a stage never succeeds silently
/// and never fails without leaving an error entry.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    /// Raw SRS reference: inline text, or a path to a document.
    pub source: String,
    /// Extracted requirements; `None` until the requirements stage has run.
    pub requirements: Option<Requirements>,
    /// Ordered human-readable progress log.
    pub logs: Vec<String>,
    /// Ordered error log; non-empty implies the run ends at the sink.
    pub errors: Vec<String>,
}

impl PipelineState {
    /// Create a fresh state for the given SRS reference.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            requirements: None,
            logs: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Append a progress log entry.
    pub fn log(&mut self, entry: impl Into<String>) {
        self.logs.push(entry.into());
    }

    /// Append an error entry.
    pub fn error(&mut self, entry: impl Into<String>) {
        self.errors.push(entry.into());
    }

    /// Whether any stage has recorded an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The extracted requirements, or the structural default when the
    /// requirements stage has not populated them.
    ///
    /// Downstream stages rely on the backfill invariant and never need
    /// existence checks; this accessor keeps that true even for a graph
    /// wired without the requirements stage.
    #[must_use]
    pub fn requirements_or_default(&self) -> Requirements {
        self.requirements.clone().unwrap_or_default()
    }
}
