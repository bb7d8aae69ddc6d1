//! Build outcome summaries.

use std::path::PathBuf;
use std::time::Duration;

use folio_core::NodeId;
use serde::Serialize;

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Fetched, grouped and written.
    Built,
    /// Written from a stored snapshot without fetching.
    Reused,
    /// Skipped; the message describes the failure.
    Failed(String),
}

impl DocumentOutcome {
    /// Returns whether the document failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Outcome of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub id: NodeId,
    pub title: String,
    /// Written file, unless the document failed.
    pub output: Option<PathBuf>,
    pub outcome: DocumentOutcome,
}

/// Summary of a completed build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// One entry per listed document, in listing order.
    pub documents: Vec<DocumentReport>,
    /// Reference occurrences recorded while rendering.
    pub references: usize,
    /// Whether failures make the build unsuccessful.
    pub strict: bool,
    pub elapsed: Duration,
}

impl BuildReport {
    /// Number of documents built from upstream content.
    pub fn built(&self) -> usize {
        self.count(|outcome| *outcome == DocumentOutcome::Built)
    }

    /// Number of documents written from snapshots.
    pub fn reused(&self) -> usize {
        self.count(|outcome| *outcome == DocumentOutcome::Reused)
    }

    /// Number of failed documents.
    pub fn failed(&self) -> usize {
        self.count(DocumentOutcome::is_failed)
    }

    /// Iterates over failed documents.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|d| d.outcome.is_failed())
    }

    /// Returns whether the build should exit successfully.
    ///
    /// Failed documents only count against a strict build.
    pub fn is_success(&self) -> bool {
        !(self.strict && self.failed() > 0)
    }

    fn count(&self, predicate: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents
            .iter()
            .filter(|document| predicate(&document.outcome))
            .count()
    }
}
