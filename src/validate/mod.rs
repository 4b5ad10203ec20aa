//! Annotation consistency validation
//!
//! Tie and tuplet annotations form per-note state sequences that must follow
//! a transition table (a tuplet `start` must be followed by `middle`, a tie
//! `start` by `stop` or `stop_start`, ...). Edits such as deleting or pasting
//! notes can break those chains. The validator finds every broken chain and
//! clears it.
//!
//! ## Algorithm
//!
//! A virtual "none" tag sits before index 0 and after the last index. For each
//! adjacent pair `(prev, curr)` whose transition is not allowed, the run of
//! non-none tags around the offending position is marked. Marked runs are
//! cleared after the scan. Runs are maximal non-none segments, and a segment
//! left unmarked had valid transitions on both sides, so a single pass is
//! enough: a second pass finds nothing.

pub mod tables;

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::models::NoteEvent;

pub use tables::{TieAnnotation, TupletAnnotation, TIE_TRANSITIONS, TUPLET_TRANSITIONS};

/// Allowed transitions: `tag → tags that may follow it`
#[derive(Debug, Clone, Copy)]
pub struct TransitionTable<T: 'static> {
    pub none: T,
    pub allowed: &'static [(T, &'static [T])],
}

impl<T: Copy + Eq> TransitionTable<T> {
    /// Tags not listed as a source allow no successor
    pub fn allows(&self, prev: T, curr: T) -> bool {
        self.allowed
            .iter()
            .find(|(from, _)| *from == prev)
            .map_or(false, |(_, to)| to.contains(&curr))
    }
}

/// Closed index interval `[start, end]` of notes whose annotation is invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InvalidRun {
    pub start: usize,
    pub end: usize,
}

impl InvalidRun {
    pub fn note_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// How the validator reads and clears one kind of annotation on a note
pub trait Annotation {
    type Tag: Copy + Eq + Hash + Debug + 'static;

    /// Short name used in logs and diagnostics ("tie", "tuplet")
    const NAME: &'static str;

    fn table() -> &'static TransitionTable<Self::Tag>;

    fn read_tag(note: &NoteEvent) -> Self::Tag;

    fn clear(note: &mut NoteEvent);
}

/// Runs of `tags` that break `table`, sorted and without duplicates
pub fn find_invalid_runs<T: Copy + Eq>(tags: &[T], table: &TransitionTable<T>) -> Vec<InvalidRun> {
    let none = table.none;
    let run_around = |anchor: usize| {
        let mut start = anchor;
        let mut end = anchor;
        while start > 0 && tags[start - 1] != none {
            start -= 1;
        }
        while end + 1 < tags.len() && tags[end + 1] != none {
            end += 1;
        }
        InvalidRun { start, end }
    };

    let mut runs: Vec<InvalidRun> = Vec::new();
    for i in 0..=tags.len() {
        let prev = if i == 0 { none } else { tags[i - 1] };
        let curr = if i == tags.len() { none } else { tags[i] };
        if table.allows(prev, curr) {
            continue;
        }
        // A disallowed step into "none" is the fault of the tag before it
        let anchor = if curr == none { i - 1 } else { i };
        let run = run_around(anchor);
        if runs.last() != Some(&run) {
            runs.push(run);
        }
    }
    runs
}

/// Generic validator/repairer for one annotation kind
pub struct ConsistencyValidator<A: Annotation> {
    _annotation: std::marker::PhantomData<A>,
}

impl<A: Annotation> ConsistencyValidator<A> {
    pub fn new() -> Self {
        ConsistencyValidator { _annotation: std::marker::PhantomData }
    }

    pub fn tags(&self, notes: &[NoteEvent]) -> Vec<A::Tag> {
        notes.iter().map(A::read_tag).collect()
    }

    /// Report invalid runs without touching the notes
    pub fn check(&self, notes: &[NoteEvent]) -> Vec<InvalidRun> {
        find_invalid_runs(&self.tags(notes), A::table())
    }

    /// Clear the annotation on every note of every invalid run
    ///
    /// Returns the runs that were cleared.
    pub fn repair(&self, notes: &mut [NoteEvent]) -> Vec<InvalidRun> {
        let runs = self.check(notes);
        for run in &runs {
            log::debug!("Clearing malformed {} run at notes {}..={}", A::NAME, run.start, run.end);
            for note in &mut notes[run.start..=run.end] {
                A::clear(note);
            }
        }
        runs
    }
}

impl<A: Annotation> Default for ConsistencyValidator<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TieState::{self, None as N, Start as S, Stop as P, StopStart as X};

    fn runs(tags: &[TieState]) -> Vec<(usize, usize)> {
        find_invalid_runs(tags, &TIE_TRANSITIONS)
            .into_iter()
            .map(|r| (r.start, r.end))
            .collect()
    }

    #[test]
    fn test_valid_chains() {
        assert!(runs(&[]).is_empty());
        assert!(runs(&[N, N]).is_empty());
        assert!(runs(&[S, P]).is_empty());
        assert!(runs(&[N, S, X, X, P, N]).is_empty());
        assert!(runs(&[S, P, S, P]).is_empty());
    }

    #[test]
    fn test_start_start_marks_whole_run() {
        // start→start breaks the chain; the run extends through the trailing stop
        assert_eq!(runs(&[N, S, S, P]), vec![(1, 3)]);
    }

    #[test]
    fn test_dangling_start_at_end() {
        assert_eq!(runs(&[N, S]), vec![(1, 1)]);
        assert_eq!(runs(&[S, N, N]), vec![(0, 0)]);
    }

    #[test]
    fn test_orphan_stop() {
        assert_eq!(runs(&[P, N]), vec![(0, 0)]);
        assert_eq!(runs(&[N, N, X, P]), vec![(2, 3)]);
    }

    #[test]
    fn test_separate_runs() {
        assert_eq!(runs(&[P, N, S, P, N, S]), vec![(0, 0), (5, 5)]);
    }

    #[test]
    fn test_run_reported_once() {
        // stop→stop and stop→start inside one run give a single entry
        assert_eq!(runs(&[S, P, P, P]), vec![(0, 3)]);
    }

    #[test]
    fn test_invalid_run_note_count() {
        let run = InvalidRun { start: 2, end: 4 };
        assert_eq!(run.note_count(), 3);
    }
}
