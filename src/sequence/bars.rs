//! Bar-relative queries
//!
//! Bars are not stored in the sequence. Their beat boundaries come from a
//! `BarContext` (the song's bar/time-signature collaborator), and the lookups
//! reuse the beat/index primitives of `NoteSequence`.

use crate::error::{Result, SequenceError};
use crate::models::{NoteEvent, TimeSignature};
use crate::rhythm::beat::round_beat;

use super::NoteSequence;

/// Source of bar boundaries and time signatures
pub trait BarContext {
    fn bar_count(&self) -> usize;

    /// Beat at which `bar` starts (bars are 0-based, beats 1-based)
    fn start_beat_of_bar(&self, bar: usize) -> Result<f64>;

    fn time_signature_at(&self, bar: usize) -> Result<TimeSignature>;

    /// Length of `bar` in quarter-note beats
    fn bar_num_beats(&self, bar: usize) -> Result<f64> {
        Ok(self.time_signature_at(bar)?.quarter_beats())
    }
}

/// Bars listed one time signature per bar
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    time_signatures: Vec<TimeSignature>,
    /// start_beats[i] = start of bar i; one extra entry for the end of the last bar
    start_beats: Vec<f64>,
}

impl BarLayout {
    pub fn new(time_signatures: Vec<TimeSignature>) -> Self {
        let mut start_beats = Vec::with_capacity(time_signatures.len() + 1);
        let mut beat = 1.0;
        start_beats.push(beat);
        for ts in &time_signatures {
            beat += ts.quarter_beats();
            start_beats.push(round_beat(beat));
        }
        BarLayout { time_signatures, start_beats }
    }

    /// `count` bars of the same time signature
    pub fn uniform(time_signature: TimeSignature, count: usize) -> Self {
        BarLayout::new(vec![time_signature; count])
    }

    /// Parse one "n/d" string per bar
    pub fn parse<S: AsRef<str>>(bars: &[S]) -> Result<Self> {
        let time_signatures = bars
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<TimeSignature>>>()?;
        Ok(BarLayout::new(time_signatures))
    }

    fn invalid_bar(&self, bar: usize) -> SequenceError {
        SequenceError::InvalidBar { bar, bar_count: self.time_signatures.len() }
    }
}

impl BarContext for BarLayout {
    fn bar_count(&self) -> usize {
        self.time_signatures.len()
    }

    /// `bar == bar_count` yields the beat just after the last bar
    fn start_beat_of_bar(&self, bar: usize) -> Result<f64> {
        self.start_beats.get(bar).copied().ok_or_else(|| self.invalid_bar(bar))
    }

    fn time_signature_at(&self, bar: usize) -> Result<TimeSignature> {
        self.time_signatures.get(bar).copied().ok_or_else(|| self.invalid_bar(bar))
    }
}

impl NoteSequence {
    /// `(first, last)` note indexes for bars `bar1..=bar2`
    pub fn indexes_between_bars(
        &self,
        bar1: usize,
        bar2: usize,
        bars: &dyn BarContext,
    ) -> Result<(usize, usize)> {
        if bar2 >= bars.bar_count() || bar1 > bar2 {
            return Err(SequenceError::InvalidBar { bar: bar2.max(bar1), bar_count: bars.bar_count() });
        }
        let start_beat = bars.start_beat_of_bar(bar1)?;
        let end_beat = if bar2 + 1 == bars.bar_count() {
            None
        } else {
            Some(bars.start_beat_of_bar(bar2 + 1)?)
        };
        self.indexes_starting_between(start_beat, end_beat, false)
    }

    /// Notes of bars `bar1..=bar2`
    pub fn notes_between_bars(
        &self,
        bar1: usize,
        bar2: usize,
        bars: &dyn BarContext,
    ) -> Result<&[NoteEvent]> {
        let (first, last) = self.indexes_between_bars(bar1, bar2, bars)?;
        Ok(self.notes(first..last))
    }

    /// Notes of one bar
    ///
    /// When the sequence ends before the bar does, a warning is logged and the
    /// notes that exist are returned.
    pub fn notes_at_bar(&self, bar: usize, bars: &dyn BarContext) -> Result<&[NoteEvent]> {
        let start_beat = bars.start_beat_of_bar(bar)?;
        let end_beat = round_beat(start_beat + bars.time_signature_at(bar)?.quarter_beats());

        if let Some(missing) = self.bar_shortfall(bar, bars)? {
            log::warn!(
                "Notes on bar {} do not fill the bar: sequence ends at beat {}, bar ends at beat {} ({} beats missing)",
                bar,
                self.total_duration() + 1.0,
                end_beat,
                missing
            );
        }

        let len = self.total();
        let first = self.next_index_by_beat(start_beat)?.unwrap_or(len);
        let last = self.next_index_by_beat(end_beat)?.unwrap_or(len);
        Ok(self.notes(first..last))
    }

    /// Beats missing at the end of `bar` when the sequence stops inside it
    pub fn bar_shortfall(&self, bar: usize, bars: &dyn BarContext) -> Result<Option<f64>> {
        let start_beat = bars.start_beat_of_bar(bar)?;
        let end_beat = round_beat(start_beat + bars.time_signature_at(bar)?.quarter_beats());
        let sequence_end = round_beat(self.total_duration() + 1.0);
        if sequence_end < end_beat {
            Ok(Some(round_beat(end_beat - sequence_end)))
        } else {
            Ok(None)
        }
    }

    /// Bar (0-based) in which the note at `index` starts
    pub fn note_bar_number(&self, index: usize, bars: &dyn BarContext) -> Result<usize> {
        if index >= self.total() {
            return Err(SequenceError::InvalidIndex { index, len: self.total() });
        }
        let mut bar = 0;
        let mut duration = 0.0;
        let mut bar_beats = bars.bar_num_beats(bar)?;
        for note in self.notes(..=index) {
            if round_beat(duration) == bar_beats {
                bar += 1;
                duration = 0.0;
                bar_beats = bars.bar_num_beats(bar)?;
            }
            duration += note.duration();
        }
        Ok(bar)
    }
}
