//! Error types for note sequence operations
//!
//! Every variant is raised before the sequence is mutated, so a failed
//! operation leaves the sequence exactly as it was.

use thiserror::Error;

/// Errors raised by `NoteSequence` and its collaborators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequenceError {
    /// Position is missing or outside the sequence
    #[error("Invalid index {index} (sequence length {len})")]
    InvalidIndex { index: usize, len: usize },

    /// Beat is NaN or outside the domain of the query
    #[error("Invalid beat: {0}")]
    InvalidBeat(f64),

    /// Value does not satisfy the NoteEvent contract
    #[error("Invalid note: {0}")]
    InvalidNote(String),

    /// Bar-relative query without a bar/time-signature collaborator
    #[error("Missing context: {0}")]
    MissingContext(&'static str),

    /// Duration cannot be expressed with canonical note values
    #[error("Duration {0} cannot be decomposed into note values")]
    InvalidDuration(f64),

    /// Bar number unknown to the bar collaborator
    #[error("Invalid bar {bar} (bar count {bar_count})")]
    InvalidBar { bar: usize, bar_count: usize },

    /// All-rest adaptation needs an explicit, positive bar count
    #[error("Adapting a rest-only sequence requires a positive bar count")]
    MissingBarCount,

    /// Malformed compact token, pitch or time signature
    #[error("Parse error: {0}")]
    Parse(String),

    /// Interchange (JSON) conversion failed
    #[error("Interchange error: {0}")]
    Interchange(String),
}

pub type Result<T> = std::result::Result<T, SequenceError>;
