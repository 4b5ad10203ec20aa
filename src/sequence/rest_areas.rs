//! Rest runs around an edit boundary
//!
//! Before notes `[start, end]` are removed or replaced, the editor needs the
//! runs of rests touching that range so they can be merged into a single rest
//! area afterwards. Four candidates are computed:
//!
//! - outer-left: rests ending at `start - 1`
//! - outer-right: rests starting at `end + 1`
//! - inner-left: rests starting at `start`, extending right while inside the range
//! - inner-right: rests ending at `end`, extending left but not into inner-left
//!
//! Same-side candidates merge when adjacent, then left and right merge when
//! adjacent. At most two disjoint intervals are returned.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SequenceError};

use super::NoteSequence;

/// Closed interval `[start, end]` of consecutive rests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestArea {
    pub start: usize,
    pub end: usize,
}

impl RestArea {
    fn new(start: usize, end: usize) -> Self {
        RestArea { start, end }
    }

    /// `self` directly followed by `other`
    fn precedes(&self, other: &RestArea) -> bool {
        self.end + 1 == other.start
    }
}

/// Join two same-side candidates when adjacent, else keep whichever exists
fn merge_side(first: Option<RestArea>, second: Option<RestArea>) -> Option<RestArea> {
    match (first, second) {
        (Some(a), Some(b)) if a.precedes(&b) => Some(RestArea::new(a.start, b.end)),
        (a, b) => a.or(b),
    }
}

impl NoteSequence {
    /// Rest runs adjacent to or inside `[start, end]`
    pub fn find_rest_areas(&self, start: usize, end: usize) -> Result<Vec<RestArea>> {
        let len = self.total();
        if end >= len {
            return Err(SequenceError::InvalidIndex { index: end, len });
        }
        if start > end {
            return Err(SequenceError::InvalidIndex { index: start, len });
        }
        let is_rest = |i: usize| self.notes[i].is_rest();

        let outer_left = if start > 0 && is_rest(start - 1) {
            let mut first = start - 1;
            while first > 0 && is_rest(first - 1) {
                first -= 1;
            }
            Some(RestArea::new(first, start - 1))
        } else {
            None
        };

        let outer_right = if end + 1 < len && is_rest(end + 1) {
            let mut last = end + 1;
            while last + 1 < len && is_rest(last + 1) {
                last += 1;
            }
            Some(RestArea::new(end + 1, last))
        } else {
            None
        };

        let inner_left = if is_rest(start) {
            let mut last = start;
            while last < end && is_rest(last + 1) {
                last += 1;
            }
            Some(RestArea::new(start, last))
        } else {
            None
        };

        let limit = inner_left.map_or(start, |area| area.end);
        let inner_right = if end > limit && is_rest(end) {
            let mut first = end;
            while first - 1 > limit && is_rest(first - 1) {
                first -= 1;
            }
            Some(RestArea::new(first, end))
        } else {
            None
        };

        let left = merge_side(outer_left, inner_left);
        let right = merge_side(inner_right, outer_right);

        Ok(match (left, right) {
            (Some(l), Some(r)) if l.precedes(&r) => vec![RestArea::new(l.start, r.end)],
            (Some(l), Some(r)) => vec![l, r],
            (l, r) => l.or(r).into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteEvent;

    /// `'r'` = rest, anything else = pitched quarter
    fn pattern(p: &str) -> NoteSequence {
        let notes = p
            .chars()
            .map(|c| {
                if c == 'r' {
                    NoteEvent::from_token("qr").unwrap()
                } else {
                    NoteEvent::from_token("C/4:q").unwrap()
                }
            })
            .collect();
        NoteSequence::from_notes(notes).unwrap()
    }

    fn areas(p: &str, start: usize, end: usize) -> Vec<(usize, usize)> {
        pattern(p)
            .find_rest_areas(start, end)
            .unwrap()
            .into_iter()
            .map(|a| (a.start, a.end))
            .collect()
    }

    #[test]
    fn test_no_rests() {
        assert!(areas("nnnn", 1, 2).is_empty());
    }

    #[test]
    fn test_outer_runs_only() {
        assert_eq!(areas("rrnnrr", 2, 3), vec![(0, 1), (4, 5)]);
    }

    #[test]
    fn test_inner_rest_not_at_boundary_is_ignored() {
        // index 5 is a rest but neither run touches it
        assert_eq!(areas("nnrrnrnrrn", 4, 6), vec![(2, 3), (7, 8)]);
    }

    #[test]
    fn test_inner_left_merges_with_outer_left() {
        assert_eq!(areas("nrrrnn", 2, 4), vec![(1, 3)]);
    }

    #[test]
    fn test_inner_right_merges_with_outer_right() {
        assert_eq!(areas("nnnrrn", 1, 3), vec![(3, 4)]);
    }

    #[test]
    fn test_all_rests_merge_into_one() {
        assert_eq!(areas("nrrrrn", 2, 3), vec![(1, 4)]);
        assert_eq!(areas("rrrr", 0, 3), vec![(0, 3)]);
    }

    #[test]
    fn test_inner_right_stops_before_inner_left() {
        assert_eq!(areas("rnr", 0, 2), vec![(0, 0), (2, 2)]);
    }

    #[test]
    fn test_single_note_range() {
        assert_eq!(areas("rnr", 1, 1), vec![(0, 0), (2, 2)]);
        assert_eq!(areas("nrn", 1, 1), vec![(1, 1)]);
    }

    #[test]
    fn test_out_of_range() {
        let s = pattern("rnr");
        assert!(matches!(s.find_rest_areas(0, 3), Err(SequenceError::InvalidIndex { .. })));
        assert!(matches!(s.find_rest_areas(2, 1), Err(SequenceError::InvalidIndex { .. })));
        assert!(NoteSequence::new().find_rest_areas(0, 0).is_err());
    }
}
