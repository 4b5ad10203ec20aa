//! Bar fill diagnostics
//!
//! A bar is under-filled when the sequence ends before the bar does. Bars
//! entirely past the end of the sequence are reported too, with the whole
//! bar missing.

use crate::error::Result;
use crate::rhythm::beat::round_beat;
use crate::sequence::{BarContext, NoteSequence};

use super::{DiagnosticMark, DiagnosticSeverity};

/// One warning per bar of `bars` that the notes do not fill
pub fn analyze_bar_fill(sequence: &NoteSequence, bars: &dyn BarContext) -> Result<Vec<DiagnosticMark>> {
    let mut marks = Vec::new();
    for bar in 0..bars.bar_count() {
        let Some(missing) = sequence.bar_shortfall(bar, bars)? else {
            continue;
        };
        let missing = round_beat(missing.min(bars.bar_num_beats(bar)?));
        let index = sequence
            .next_index_by_beat(bars.start_beat_of_bar(bar)?)?
            .unwrap_or(sequence.total());
        let notes_in_bar = sequence.total() - index;

        marks.push(
            DiagnosticMark::new(
                index,
                DiagnosticSeverity::Warning,
                "bar_underfilled",
                format!("Bar {} is missing {} beats", bar + 1, missing),
            )
            .with_len(notes_in_bar),
        );
    }
    Ok(marks)
}
