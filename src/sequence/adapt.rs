//! Gap filling and re-segmentation into a single time signature
//!
//! `adapt_to_time_signature` produces a new sequence whose notes never cross
//! a barline of the target time signature. A note that overflows the current
//! bar is split at the barline and the pieces are tied (`start`, then
//! `stop_start` for every further barline it crosses, then `stop`). The last
//! bar is padded with rests, so the total duration is always a whole number
//! of bars.

use crate::error::{Result, SequenceError};
use crate::models::{NoteEvent, TieState, TimeSignature};
use crate::rhythm::beat::round_beat;
use crate::rhythm::duration::DurationDecomposer;

use super::NoteSequence;

impl NoteSequence {
    /// Append rests covering each duration, in order
    ///
    /// Each duration is decomposed into canonical note values using the
    /// sequence's decomposition settings. Zero durations add nothing. The
    /// sequence is left unchanged if any duration cannot be decomposed.
    pub fn fill_gap_with_rests(&mut self, durations: &[f64]) -> Result<()> {
        let decomposer = DurationDecomposer::new(self.settings);
        let mut rests = Vec::new();
        for &duration in durations {
            for token in decomposer.decompose(duration)? {
                rests.push(NoteEvent::from_duration_token(&token, None));
            }
        }
        self.notes.extend(rests);
        Ok(())
    }

    /// Copy of the sequence fitted to bars of `time_signature`
    ///
    /// A sequence of only rests (or no notes) has no rhythm to keep, so it
    /// becomes `num_bars` bars of rests and `num_bars` must be positive.
    /// Otherwise `num_bars` is ignored. The source is not modified and tie or
    /// tuplet chains are not revised.
    pub fn adapt_to_time_signature(
        &self,
        time_signature: &TimeSignature,
        num_bars: Option<usize>,
    ) -> Result<NoteSequence> {
        let bar_beats = time_signature.quarter_beats();
        let mut adapted = NoteSequence::with_settings(self.settings);

        if self.only_rests() {
            let num_bars = num_bars.filter(|&n| n > 0).ok_or(SequenceError::MissingBarCount)?;
            adapted.fill_gap_with_rests(&vec![bar_beats; num_bars])?;
            return Ok(adapted);
        }

        let last = self.notes.len() - 1;
        let mut acc = 0.0;
        for (i, source) in self.notes.iter().enumerate() {
            let mut note = source.clone();
            let mut continues_tie = false;
            acc += note.duration();

            while round_beat(acc) > bar_beats {
                let overflow = round_beat(round_beat(acc) - bar_beats);
                let mut head = note.clone();
                head.set_duration_by_beats(note.duration() - overflow)?;
                note.set_duration_by_beats(overflow)?;

                if note.is_rest() {
                    head.remove_tie();
                    note.remove_tie();
                } else {
                    head.set_tie(if continues_tie { TieState::StopStart } else { TieState::Start });
                    note.set_tie(TieState::Stop);
                }
                log::debug!(
                    "Splitting note {} at barline: {} + {} beats",
                    i,
                    head.duration(),
                    overflow
                );

                adapted.notes.push(head);
                continues_tie = true;
                acc = overflow;
            }

            if round_beat(acc) == bar_beats && i < last {
                acc = 0.0;
            }
            adapted.notes.push(note);
        }

        let gap = round_beat(bar_beats - acc);
        if gap > 0.0 {
            adapted.pad_with_rests(gap)?;
        }
        Ok(adapted)
    }

    /// Append rests totalling `beats`, ending in one exact rest for any
    /// part the note values cannot express (quintuplets and the like)
    fn pad_with_rests(&mut self, beats: f64) -> Result<()> {
        let (tokens, leftover) = DurationDecomposer::new(self.settings).decompose_partial(beats)?;
        self.notes
            .extend(tokens.iter().map(|token| NoteEvent::from_duration_token(token, None)));
        if leftover > 0.0 {
            log::debug!("Padding bar with an off-grid rest of {} beats", leftover);
            self.notes.push(NoteEvent::rest(leftover)?);
        }
        Ok(())
    }
}
