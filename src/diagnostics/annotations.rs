//! Annotation chain diagnostics
//!
//! Reports the runs `NoteSequence::revise_notes` would clear, one error mark
//! per run, without touching the notes.

use crate::sequence::NoteSequence;
use crate::validate::{Annotation, ConsistencyValidator, TieAnnotation, TupletAnnotation};

use super::{DiagnosticMark, DiagnosticSeverity};

/// Malformed runs of one annotation kind
pub fn analyze_annotation<A: Annotation>(sequence: &NoteSequence) -> Vec<DiagnosticMark> {
    let notes = sequence.notes(..);
    ConsistencyValidator::<A>::new()
        .check(notes)
        .into_iter()
        .map(|run| {
            DiagnosticMark::new(
                run.start,
                DiagnosticSeverity::Error,
                format!("{}_invalid_run", A::NAME),
                format!(
                    "Malformed {} chain on notes {}..={}",
                    A::NAME,
                    run.start,
                    run.end
                ),
            )
            .with_len(run.note_count())
        })
        .collect()
}

/// Malformed tuplet and tie runs, tuplets first
pub fn analyze_annotations(sequence: &NoteSequence) -> Vec<DiagnosticMark> {
    let mut marks = analyze_annotation::<TupletAnnotation>(sequence);
    marks.extend(analyze_annotation::<TieAnnotation>(sequence));
    marks
}
