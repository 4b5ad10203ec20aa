//! Note sequence
//!
//! `NoteSequence` is the ordered list of notes and rests of one melody.
//! Every note can be addressed two ways:
//!
//! - by **index** (0-based position in the list)
//! - by **beat** (1-based cumulative position: `beat(i) = 1 + Σ duration(k<i)`)
//!
//! Beat arithmetic always goes through `round_beat` so tuplet drift
//! (1/3 + 1/3 + 1/3 = 0.9999999) never shifts an index lookup.
//!
//! Range queries return borrowed slices. A slice is a live view of the
//! stored notes, and the borrow checker rejects structural edits
//! (`splice`, `add_note`, `delete_note`) while a view is held.
//! Use `clone_range` for independent copies.
//!
//! # Submodules
//!
//! - **bars**: bar-relative queries through a `BarContext` collaborator
//! - **rest_areas**: rest runs around an edit boundary
//! - **adapt**: gap filling and re-segmentation into a time signature

pub mod adapt;
pub mod bars;
pub mod rest_areas;

use std::ops::{Bound, Range, RangeBounds};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SequenceError};
use crate::models::{NoteEvent, TieState};
use crate::rhythm::beat::{beats_equal, round_beat};
use crate::rhythm::duration::DecompositionSettings;
use crate::validate::{ConsistencyValidator, InvalidRun, TieAnnotation, TupletAnnotation};

pub use bars::{BarContext, BarLayout};
pub use rest_areas::RestArea;

/// Ordered container of notes and rests
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NoteSequence {
    notes: Vec<NoteEvent>,
    #[serde(default)]
    settings: DecompositionSettings,
}

/// Annotation runs cleared by `revise_notes`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Revision {
    pub tuplets: Vec<InvalidRun>,
    pub ties: Vec<InvalidRun>,
}

impl Revision {
    pub fn is_clean(&self) -> bool {
        self.tuplets.is_empty() && self.ties.is_empty()
    }
}

/// Result of walking the sequence up to a beat
struct BeatCursor {
    /// First index whose start is at or after the beat (may equal len)
    index: usize,
    /// Unrounded start beat of `index`
    beat: f64,
    /// Ran out of notes before reaching the beat
    exhausted: bool,
}

impl NoteSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DecompositionSettings) -> Self {
        NoteSequence { notes: Vec::new(), settings }
    }

    /// Bulk import; every note must satisfy the NoteEvent contract
    pub fn from_notes(notes: Vec<NoteEvent>) -> Result<Self> {
        let mut sequence = NoteSequence::new();
        sequence.set_notes(notes)?;
        Ok(sequence)
    }

    pub fn settings(&self) -> &DecompositionSettings {
        &self.settings
    }

    /// Replace the whole content
    pub fn set_notes(&mut self, notes: Vec<NoteEvent>) -> Result<()> {
        for note in &notes {
            note.validate()?;
        }
        self.notes = notes;
        Ok(())
    }

    /// Number of notes
    pub fn total(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteEvent> {
        self.notes.iter()
    }

    /// Sum of all durations, rounded
    pub fn total_duration(&self) -> f64 {
        self.total_duration_of(..)
    }

    /// Sum of durations over an index range, rounded
    pub fn total_duration_of<R: RangeBounds<usize>>(&self, range: R) -> f64 {
        round_beat(self.notes(range).iter().map(NoteEvent::duration).sum())
    }

    pub fn note(&self, pos: usize) -> Option<&NoteEvent> {
        self.notes.get(pos)
    }

    pub fn note_mut(&mut self, pos: usize) -> Option<&mut NoteEvent> {
        self.notes.get_mut(pos)
    }

    /// View of an index range; bounds past the end are clamped
    pub fn notes<R: RangeBounds<usize>>(&self, range: R) -> &[NoteEvent] {
        let range = self.clamped(range);
        &self.notes[range]
    }

    /// Mutable view of an index range; bounds past the end are clamped
    pub fn notes_mut<R: RangeBounds<usize>>(&mut self, range: R) -> &mut [NoteEvent] {
        let range = self.clamped(range);
        &mut self.notes[range]
    }

    /// Deep copies of an index range
    pub fn clone_range<R: RangeBounds<usize>>(&self, range: R) -> Vec<NoteEvent> {
        self.notes(range).to_vec()
    }

    /// Append `note`, or insert it before `pos`
    pub fn add_note(&mut self, note: NoteEvent, pos: Option<usize>) -> Result<()> {
        note.validate()?;
        match pos {
            None => self.notes.push(note),
            Some(pos) if pos <= self.notes.len() => self.notes.insert(pos, note),
            Some(pos) => return Err(self.invalid_index(pos)),
        }
        Ok(())
    }

    /// Insert deep copies of `notes` before `pos` (append when omitted)
    pub fn add_notes(&mut self, notes: &[NoteEvent], pos: Option<usize>) -> Result<()> {
        let pos = pos.unwrap_or(self.notes.len());
        self.splice(pos..pos, notes).map(|_| ())
    }

    /// Remove and return the note at `pos`
    pub fn delete_note(&mut self, pos: usize) -> Result<NoteEvent> {
        if pos >= self.notes.len() {
            return Err(self.invalid_index(pos));
        }
        Ok(self.notes.remove(pos))
    }

    /// Replace a range by deep copies of `replacement`, returning the removed notes
    ///
    /// `p1..=p2` removes the closed interval `[p1, p2]`; an empty range `p..p`
    /// inserts at `p` without removing anything.
    pub fn splice<R: RangeBounds<usize>>(
        &mut self,
        range: R,
        replacement: &[NoteEvent],
    ) -> Result<Vec<NoteEvent>> {
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => self.notes.len(),
        };
        if end > self.notes.len() {
            return Err(self.invalid_index(end.saturating_sub(1)));
        }
        if start > end {
            return Err(self.invalid_index(start));
        }
        for note in replacement {
            note.validate()?;
        }

        Ok(self.notes.splice(start..end, replacement.iter().cloned()).collect())
    }

    /// Starting beat of the note at `index` (1-based)
    pub fn note_beat(&self, index: usize) -> Result<f64> {
        if index >= self.notes.len() {
            return Err(self.invalid_index(index));
        }
        let offset: f64 = self.notes[..index].iter().map(NoteEvent::duration).sum();
        Ok(round_beat(1.0 + offset))
    }

    /// `[start beat of start, end beat of end]` for two note indexes
    pub fn beat_interval(&self, start: usize, end: usize) -> Result<(f64, f64)> {
        let start_beat = self.note_beat(start)?;
        let end_beat = self.note_beat(end)? + self.notes[end].duration();
        Ok((start_beat, round_beat(end_beat)))
    }

    /// Smallest index starting at or after `beat`
    ///
    /// `None` when no note starts at or after `beat`.
    pub fn next_index_by_beat(&self, beat: f64) -> Result<Option<usize>> {
        if beat.is_nan() || beat < 1.0 {
            return Err(SequenceError::InvalidBeat(beat));
        }
        let cursor = self.cursor_at_beat(beat);
        if cursor.exhausted || cursor.index >= self.notes.len() {
            return Ok(None);
        }
        Ok(Some(cursor.index))
    }

    /// Largest index starting at or before `beat`
    ///
    /// With `exact_exclude`, a note starting exactly at `beat` is skipped and
    /// the one before it is returned.
    pub fn prev_index_by_beat(&self, beat: f64, exact_exclude: bool) -> Result<Option<usize>> {
        if beat.is_nan() || beat < 0.0 {
            return Err(SequenceError::InvalidBeat(beat));
        }
        let cursor = self.cursor_at_beat(beat);
        let exact = !cursor.exhausted
            && cursor.index < self.notes.len()
            && beats_equal(cursor.beat, beat);
        if exact && !exact_exclude {
            Ok(Some(cursor.index))
        } else {
            Ok(cursor.index.checked_sub(1))
        }
    }

    /// `(first, last)` indexes of notes starting between two beats
    ///
    /// `start_beat` below 1 (or NaN) is clamped to 1. Without `end_beat`, or
    /// past the total duration, `last` is the sequence length (length - 1
    /// with `exact_exclude`).
    pub fn indexes_starting_between(
        &self,
        start_beat: f64,
        end_beat: Option<f64>,
        exact_exclude: bool,
    ) -> Result<(usize, usize)> {
        let start_beat = if start_beat.is_nan() || start_beat < 1.0 { 1.0 } else { start_beat };
        let first = self.next_index_by_beat(start_beat)?.unwrap_or(self.notes.len());

        let to_end = if exact_exclude {
            self.notes.len().saturating_sub(1)
        } else {
            self.notes.len()
        };
        let last = match end_beat {
            None => to_end,
            Some(end) if end.is_nan() => return Err(SequenceError::InvalidBeat(end)),
            Some(end) if round_beat(end) > self.total_duration() => to_end,
            Some(end) => self.prev_index_by_beat(end, exact_exclude)?.unwrap_or(0),
        };
        Ok((first, last))
    }

    /// True when every note is a rest (vacuously true when empty)
    pub fn only_rests(&self) -> bool {
        self.notes.iter().all(NoteEvent::is_rest)
    }

    /// Drop ties between adjacent notes of different pitch
    pub fn revise_ties_pitch(&mut self) {
        for i in 1..self.notes.len() {
            let (prev, curr) = (&self.notes[i - 1], &self.notes[i]);
            if prev.is_tie(TieState::Start) && curr.is_tie(TieState::Stop) && prev.pitch() != curr.pitch() {
                log::debug!("Removing tie between notes {} and {}: pitches differ", i - 1, i);
                self.notes[i - 1].remove_tie();
                self.notes[i].remove_tie();
            }
        }
    }

    /// Clear malformed tuplet and tie chains
    pub fn revise_notes(&mut self) -> Revision {
        let tuplets = ConsistencyValidator::<TupletAnnotation>::new().repair(&mut self.notes);
        let ties = ConsistencyValidator::<TieAnnotation>::new().repair(&mut self.notes);
        Revision { tuplets, ties }
    }

    /// Display strings of all notes ("Db/4:q", "hr")
    pub fn note_strings(&self) -> Vec<String> {
        self.notes.iter().map(ToString::to_string).collect()
    }

    /// Index of the first note equal to `note`
    pub fn position_of(&self, note: &NoteEvent) -> Option<usize> {
        self.notes.iter().position(|n| n == note)
    }

    fn cursor_at_beat(&self, beat: f64) -> BeatCursor {
        let target = round_beat(beat);
        let mut index = 0;
        let mut current = 1.0;
        // Compare rounded values without carrying the rounding into the sum
        while round_beat(current) < target {
            match self.notes.get(index) {
                Some(note) => {
                    current += note.duration();
                    index += 1;
                }
                None => {
                    return BeatCursor { index, beat: current, exhausted: true };
                }
            }
        }
        BeatCursor { index, beat: current, exhausted: false }
    }

    fn clamped<R: RangeBounds<usize>>(&self, range: R) -> Range<usize> {
        let len = self.notes.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        let end = end.min(len);
        start.min(end)..end
    }

    fn invalid_index(&self, index: usize) -> SequenceError {
        SequenceError::InvalidIndex { index, len: self.notes.len() }
    }
}

impl<'a> IntoIterator for &'a NoteSequence {
    type Item = &'a NoteEvent;
    type IntoIter = std::slice::Iter<'a, NoteEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}
