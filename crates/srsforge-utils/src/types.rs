//! Core identifier types shared across the workspace.

use serde::{Deserialize, Serialize};

/// Identifies a stage in the generation pipeline.
///
/// This is a closed enumeration: routing decisions are values of this type,
/// so a misspelled or unreachable routing target is a compile error rather
/// than a runtime surprise. The string forms returned by [`as_str`] are the
/// canonical lowercase names used in logs and CLI output.
///
/// [`as_str`]: StageId::as_str
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageId {
    /// Requirements extraction: SRS text to structured requirements.
    Requirements,
    /// Project scaffolding: directory layout, database, environment.
    Scaffold,
    /// Test-suite generation: one pytest file per endpoint/model/auth.
    Tests,
    /// Code generation: models, routes, and services.
    Code,
    /// Verification and single-cycle repair of the generated suite.
    Verify,
    /// Terminal success stage.
    Complete,
    /// Terminal error sink reached from any failure edge.
    Sink,
}

impl StageId {
    /// Returns the canonical lowercase name of the stage.
    ///
    /// # Example
    ///
    /// ```rust
    /// use srsforge_utils::types::StageId;
    ///
    /// assert_eq!(StageId::Requirements.as_str(), "requirements");
    /// assert_eq!(StageId::Sink.as_str(), "sink");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requirements => "requirements",
            Self::Scaffold => "scaffold",
            Self::Tests => "tests",
            Self::Code => "code",
            Self::Verify => "verify",
            Self::Complete => "complete",
            Self::Sink => "sink",
        }
    }

    /// All stage identifiers in pipeline order, terminals last.
    pub const ALL: [Self; 7] = [
        Self::Requirements,
        Self::Scaffold,
        Self::Tests,
        Self::Code,
        Self::Verify,
        Self::Complete,
        Self::Sink,
    ];
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_are_lowercase_and_unique() {
        let names: Vec<&str> = StageId::ALL.iter().map(StageId::as_str).collect();
        for name in &names {
            assert_eq!(*name, name.to_lowercase());
        }
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn serde_round_trip_uses_canonical_names() {
        let json = serde_json::to_string(&StageId::Requirements).unwrap();
        assert_eq!(json, "\"requirements\"");
        let back: StageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StageId::Requirements);
    }
}
