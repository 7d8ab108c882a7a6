//! Stage graph: registered stages, one entry, guarded edges.
//!
//! The realized pipeline is a linear chain with per-stage sink shortcuts,
//! but the graph itself supports arbitrary guard predicates so new
//! branches slot in without redesign.

use std::collections::HashMap;
use std::sync::Arc;

use srsforge_stage_api::{Stage, StageId, StageOutcome};
use thiserror::Error;

/// Predicate over a just-produced stage outcome. The first edge (in
/// registration order) whose guard accepts decides the successor.
pub type Guard = Arc<dyn Fn(&StageOutcome) -> bool + Send + Sync>;

/// Graph configuration failures. These indicate a miswired pipeline, not
/// bad runtime data, and are reported before or instead of running stages.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("no entry stage designated")]
    MissingEntry,

    #[error("entry stage '{0}' is not registered")]
    UnregisteredEntry(StageId),

    #[error("edge {from} -> {to} references an unregistered stage")]
    UnregisteredEdge { from: StageId, to: StageId },

    #[error("stage '{from}' returned unknown stage identifier '{returned}'")]
    UnknownStage { from: StageId, returned: StageId },

    #[error("no edge out of stage '{from}' accepted the outcome (requested '{requested}')")]
    NoMatchingEdge { from: StageId, requested: StageId },
}

struct Edge {
    to: StageId,
    guard: Option<Guard>,
}

impl Edge {
    fn accepts(&self, outcome: &StageOutcome) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard(outcome))
    }
}

/// A validated, runnable stage graph.
pub struct StageGraph {
    stages: HashMap<StageId, Arc<dyn Stage>>,
    edges: HashMap<StageId, Vec<Edge>>,
    entry: StageId,
}

// Stages are trait objects and guards are closures, so Debug is manual
// and structural: identifiers only.
impl std::fmt::Debug for StageGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stages: Vec<StageId> = self.stages.keys().copied().collect();
        stages.sort_by_key(StageId::as_str);
        f.debug_struct("StageGraph")
            .field("entry", &self.entry)
            .field("stages", &stages)
            .finish_non_exhaustive()
    }
}

impl StageGraph {
    pub(crate) fn entry(&self) -> StageId {
        self.entry
    }

    pub(crate) fn stage(&self, id: StageId) -> Option<&Arc<dyn Stage>> {
        self.stages.get(&id)
    }

    pub(crate) fn is_registered(&self, id: StageId) -> bool {
        self.stages.contains_key(&id)
    }

    /// A node with no outgoing edges is terminal.
    pub(crate) fn is_terminal(&self, id: StageId) -> bool {
        self.edges.get(&id).is_none_or(Vec::is_empty)
    }

    /// The successor chosen by the first accepting edge out of `from`.
    pub(crate) fn select_successor(
        &self,
        from: StageId,
        outcome: &StageOutcome,
    ) -> Result<StageId, GraphError> {
        self.edges
            .get(&from)
            .into_iter()
            .flatten()
            .find(|edge| edge.accepts(outcome))
            .map(|edge| edge.to)
            .ok_or(GraphError::NoMatchingEdge {
                from,
                requested: outcome.next,
            })
    }
}

/// Builder for [`StageGraph`]. Validation happens in [`build`](Self::build),
/// before any stage runs.
#[derive(Default)]
pub struct GraphBuilder {
    stages: HashMap<StageId, Arc<dyn Stage>>,
    edges: HashMap<StageId, Vec<Edge>>,
    edge_order: Vec<(StageId, StageId)>,
    entry: Option<StageId>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage under its own identifier.
    #[must_use]
    pub fn stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.insert(stage.id(), stage);
        self
    }

    /// Designate the entry stage.
    #[must_use]
    pub fn entry(mut self, id: StageId) -> Self {
        self.entry = Some(id);
        self
    }

    /// Add a guard-less edge; it accepts every outcome.
    #[must_use]
    pub fn edge(self, from: StageId, to: StageId) -> Self {
        self.push_edge(from, to, None)
    }

    /// Add an edge that is taken only when `guard` accepts the outcome.
    #[must_use]
    pub fn edge_if(
        self,
        from: StageId,
        to: StageId,
        guard: impl Fn(&StageOutcome) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.push_edge(from, to, Some(Arc::new(guard)))
    }

    fn push_edge(mut self, from: StageId, to: StageId, guard: Option<Guard>) -> Self {
        self.edges.entry(from).or_default().push(Edge { to, guard });
        self.edge_order.push((from, to));
        self
    }

    /// Validate and produce the graph.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::MissingEntry` when no entry was designated,
    /// `GraphError::UnregisteredEntry` when no registered stage matches
    /// the entry, and `GraphError::UnregisteredEdge` for any edge endpoint
    /// without a registered stage.
    pub fn build(self) -> Result<StageGraph, GraphError> {
        let entry = self.entry.ok_or(GraphError::MissingEntry)?;
        if !self.stages.contains_key(&entry) {
            return Err(GraphError::UnregisteredEntry(entry));
        }

        for (from, to) in &self.edge_order {
            if !self.stages.contains_key(from) || !self.stages.contains_key(to) {
                return Err(GraphError::UnregisteredEdge {
                    from: *from,
                    to: *to,
                });
            }
        }

        Ok(StageGraph {
            stages: self.stages,
            edges: self.edges,
            entry,
        })
    }
}

/// Guard that accepts when the stage requested `target` as its successor.
/// This is the guard the standard pipeline wiring uses everywhere.
#[must_use]
pub fn routed_to(target: StageId) -> impl Fn(&StageOutcome) -> bool + Send + Sync + 'static {
    move |outcome| outcome.next == target
}
