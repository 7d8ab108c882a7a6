//! SRS text acquisition.
//!
//! The pipeline treats document text extraction as an opaque collaborator:
//! a path goes in, plain text comes out. The production implementation
//! reads UTF-8 text files; richer formats (docx and friends) plug in
//! behind the same trait.

use std::path::Path;

use async_trait::async_trait;
use srsforge_utils::error::PipelineError;

/// Collaborator that turns a document path into plain text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Extract the full text of the document at `path`, paragraphs joined
    /// with newlines.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Transport` when the document cannot be read
    /// or decoded.
    async fn extract_text(&self, path: &Path) -> Result<String, PipelineError>;
}

/// Reads documents as UTF-8 text files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract_text(&self, path: &Path) -> Result<String, PipelineError> {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            PipelineError::Transport(format!("failed to read document {}: {e}", path.display()))
        })
    }
}
