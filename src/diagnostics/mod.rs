//! Diagnostics for note sequences
//!
//! Non-fatal checks that report problems without changing the sequence, so
//! an editor can highlight them before (or instead of) repairing.
//! Annotation chains and bar fill are the current checks.

pub mod annotations;
pub mod bar_fill;

use serde::{Deserialize, Serialize};

pub use annotations::{analyze_annotation, analyze_annotations};
pub use bar_fill::analyze_bar_fill;

/// Severity level for diagnostic marks
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// A diagnostic mark highlighting a run of notes
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DiagnosticMark {
    /// Index of the first note concerned
    pub index: usize,
    /// Number of notes highlighted (default 1)
    pub len: usize,
    pub severity: DiagnosticSeverity,
    /// Kind identifier (e.g. "tie_invalid_run", "bar_underfilled")
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

impl DiagnosticMark {
    pub fn new(
        index: usize,
        severity: DiagnosticSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            index,
            len: 1,
            severity,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create with custom length (for range highlights)
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }
}

/// Collection of diagnostic marks for a sequence
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Diagnostics {
    pub marks: Vec<DiagnosticMark>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { marks: Vec::new() }
    }

    pub fn add(&mut self, mark: DiagnosticMark) {
        self.marks.push(mark);
    }

    pub fn extend(&mut self, marks: impl IntoIterator<Item = DiagnosticMark>) {
        self.marks.extend(marks);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.marks
            .iter()
            .any(|m| m.severity == DiagnosticSeverity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Marks of one kind
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a DiagnosticMark> + 'a {
        self.marks.iter().filter(move |m| m.kind == kind)
    }
}
