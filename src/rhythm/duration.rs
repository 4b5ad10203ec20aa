//! Duration decomposition
//!
//! Turns an arbitrary beat duration into the canonical, individually
//! renderable note values that sum to it, e.g. 5 beats → whole + quarter,
//! 1/3 beat → triplet eighth.
//!
//! Durations are snapped to a grid of `DIVISIONS_PER_BEAT` ticks per quarter
//! note, which holds every supported value exactly (64th = 3 ticks,
//! triplet 64th = 2 ticks). Among all token lists that sum to the duration
//! the shortest one is chosen, preferring plain values over triplets, then
//! the largest value first.

use num_rational::Rational32;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SequenceError};
use crate::rhythm::beat::round_beat;

/// Ticks per quarter note on the decomposition grid
pub const DIVISIONS_PER_BEAT: i32 = 48;

/// Undotted, untupled note values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteValue {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
}

impl NoteValue {
    pub const ALL: [NoteValue; 7] = [
        NoteValue::Whole,
        NoteValue::Half,
        NoteValue::Quarter,
        NoteValue::Eighth,
        NoteValue::Sixteenth,
        NoteValue::ThirtySecond,
        NoteValue::SixtyFourth,
    ];

    /// Length in quarter-note beats
    pub fn beats(&self) -> Rational32 {
        match self {
            NoteValue::Whole => Rational32::from_integer(4),
            NoteValue::Half => Rational32::from_integer(2),
            NoteValue::Quarter => Rational32::from_integer(1),
            NoteValue::Eighth => Rational32::new(1, 2),
            NoteValue::Sixteenth => Rational32::new(1, 4),
            NoteValue::ThirtySecond => Rational32::new(1, 8),
            NoteValue::SixtyFourth => Rational32::new(1, 16),
        }
    }

    /// Short code used in compact note tokens ("q", "8", ...)
    pub fn code(&self) -> &'static str {
        match self {
            NoteValue::Whole => "w",
            NoteValue::Half => "h",
            NoteValue::Quarter => "q",
            NoteValue::Eighth => "8",
            NoteValue::Sixteenth => "16",
            NoteValue::ThirtySecond => "32",
            NoteValue::SixtyFourth => "64",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        NoteValue::ALL.iter().copied().find(|v| v.code() == code)
    }
}

/// One renderable duration: a note value, optionally dotted or a triplet member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationToken {
    pub value: NoteValue,
    pub dots: u8,
    pub triplet: bool,
}

impl DurationToken {
    pub fn new(value: NoteValue) -> Self {
        DurationToken { value, dots: 0, triplet: false }
    }

    pub fn dotted(value: NoteValue) -> Self {
        DurationToken { value, dots: 1, triplet: false }
    }

    pub fn triplet(value: NoteValue) -> Self {
        DurationToken { value, dots: 0, triplet: true }
    }

    /// Exact length in beats
    pub fn beats(&self) -> Rational32 {
        let mut beats = self.value.beats();
        if self.dots > 0 {
            // dotted = base * (2 - 1/2^dots)
            beats = beats * Rational32::new((1 << (self.dots + 1)) - 1, 1 << self.dots);
        }
        if self.triplet {
            beats = beats * Rational32::new(2, 3);
        }
        beats
    }

    pub fn beats_f64(&self) -> f64 {
        let beats = self.beats();
        *beats.numer() as f64 / *beats.denom() as f64
    }

    /// Compact code: value code, one "d" per dot, "t" for triplets ("qd", "8t")
    pub fn code(&self) -> String {
        let mut code = self.value.code().to_string();
        code.push_str(&"d".repeat(self.dots as usize));
        if self.triplet {
            code.push('t');
        }
        code
    }

    pub fn from_code(code: &str) -> Result<Self> {
        let mut rest = code;
        let triplet = rest.ends_with('t');
        if triplet {
            rest = &rest[..rest.len() - 1];
        }
        let base = rest.trim_end_matches('d');
        let dots = (rest.len() - base.len()) as u8;
        let value = NoteValue::from_code(base)
            .ok_or_else(|| SequenceError::Parse(format!("unknown duration code '{}'", code)))?;
        if dots > 2 {
            return Err(SequenceError::Parse(format!("too many dots in '{}'", code)));
        }
        Ok(DurationToken { value, dots, triplet })
    }

    fn ticks(&self) -> Option<i32> {
        let scaled = self.beats() * Rational32::from_integer(DIVISIONS_PER_BEAT);
        if scaled.is_integer() {
            Some(scaled.to_integer())
        } else {
            None
        }
    }
}

/// Which token families the decomposer may emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionSettings {
    /// Allow single-dotted values (dotted half = 3 beats)
    pub allow_dotted: bool,

    /// Allow triplet values (triplet eighth = 1/3 beat)
    pub allow_triplets: bool,
}

impl Default for DecompositionSettings {
    fn default() -> Self {
        Self {
            allow_dotted: true,
            allow_triplets: true,
        }
    }
}

/// Splits beat durations into canonical note values
#[derive(Debug, Clone)]
pub struct DurationDecomposer {
    /// Candidate tokens with their tick length, longest first
    candidates: Vec<(DurationToken, i32)>,
}

impl DurationDecomposer {
    pub fn new(settings: DecompositionSettings) -> Self {
        let mut candidates = Vec::new();
        for value in NoteValue::ALL {
            candidates.push(DurationToken::new(value));
            if settings.allow_dotted {
                candidates.push(DurationToken::dotted(value));
            }
            if settings.allow_triplets {
                candidates.push(DurationToken::triplet(value));
            }
        }
        let mut candidates: Vec<(DurationToken, i32)> = candidates
            .into_iter()
            .filter_map(|token| token.ticks().map(|ticks| (token, ticks)))
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        DurationDecomposer { candidates }
    }

    /// Decompose `beats` into the fewest tokens, largest first
    ///
    /// Zero yields an empty list. Negative, non-finite or off-grid durations fail
    /// with `InvalidDuration`.
    pub fn decompose(&self, beats: f64) -> Result<Vec<DurationToken>> {
        let (ticks, on_grid) = grid_ticks(beats)?;
        let (tokens, covered) = self.tokens_for_ticks(ticks);
        if !on_grid || covered != ticks {
            return Err(SequenceError::InvalidDuration(beats));
        }
        Ok(tokens)
    }

    /// Tokens for the longest prefix of `beats` the grid can express
    ///
    /// Returns the tokens and the beats left over (zero when `beats` is on the
    /// grid). Used where a duration must be filled even if it is a quintuplet
    /// or other off-grid fraction.
    pub fn decompose_partial(&self, beats: f64) -> Result<(Vec<DurationToken>, f64)> {
        let (ticks, _) = grid_ticks(beats)?;
        let (tokens, covered) = self.tokens_for_ticks(ticks);
        let leftover = round_beat(beats - covered as f64 / DIVISIONS_PER_BEAT as f64);
        Ok((tokens, leftover.max(0.0)))
    }

    /// Best token list for at most `total` ticks, with the ticks it covers
    ///
    /// Whatever exceeds `DP_WINDOW` longest tokens is emitted as longest
    /// tokens directly, so the table stays small for any duration.
    fn tokens_for_ticks(&self, total: u64) -> (Vec<DurationToken>, u64) {
        let Some(&(longest, longest_ticks)) = self.candidates.first() else {
            return (Vec::new(), 0);
        };
        let longest_ticks = longest_ticks as u64;
        let window = DP_WINDOW * longest_ticks;
        let bulk = if total > window {
            (total - window).div_ceil(longest_ticks)
        } else {
            0
        };
        let remainder = (total - bulk * longest_ticks) as usize;

        // fewest[n] = (token count, triplet count) of the best list summing to n ticks
        let mut fewest: Vec<Option<(u32, u32)>> = vec![None; remainder + 1];
        fewest[0] = Some((0, 0));
        for n in 1..=remainder {
            fewest[n] = self
                .candidates
                .iter()
                .filter(|(_, ticks)| *ticks as usize <= n)
                .filter_map(|(token, ticks)| {
                    fewest[n - *ticks as usize]
                        .map(|(count, triplets)| (count + 1, triplets + token.triplet as u32))
                })
                .min();
        }
        let reachable = (0..=remainder).rev().find(|&n| fewest[n].is_some()).unwrap_or(0);

        let mut tokens = vec![longest; bulk as usize];
        let mut remaining = reachable;
        while remaining > 0 {
            let Some((count, triplets)) = fewest[remaining] else {
                break;
            };
            let step = self.candidates.iter().find(|(token, ticks)| {
                let Some(rest_triplets) = triplets.checked_sub(token.triplet as u32) else {
                    return false;
                };
                (*ticks as usize) <= remaining
                    && fewest[remaining - *ticks as usize] == Some((count - 1, rest_triplets))
            });
            let Some((token, ticks)) = step else {
                break;
            };
            tokens.push(*token);
            remaining -= *ticks as usize;
        }

        let covered = bulk * longest_ticks + (reachable - remaining) as u64;
        (tokens, covered)
    }
}

/// Longest-token multiples kept in the decomposition table
const DP_WINDOW: u64 = 4;

/// Largest tick count accepted (about 89 million beats)
const MAX_TICKS: f64 = u32::MAX as f64;

/// Tick count of `beats` (floored when off the grid) and whether it is on the grid
fn grid_ticks(beats: f64) -> Result<(u64, bool)> {
    if !beats.is_finite() || round_beat(beats) < 0.0 {
        return Err(SequenceError::InvalidDuration(beats));
    }
    let exact = beats * DIVISIONS_PER_BEAT as f64;
    if exact > MAX_TICKS {
        return Err(SequenceError::InvalidDuration(beats));
    }
    let nearest = exact.round();
    if round_beat(nearest / DIVISIONS_PER_BEAT as f64) == round_beat(beats) {
        Ok((nearest.max(0.0) as u64, true))
    } else {
        Ok((exact.floor().max(0.0) as u64, false))
    }
}

impl Default for DurationDecomposer {
    fn default() -> Self {
        DurationDecomposer::new(DecompositionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(tokens: &[DurationToken]) -> Vec<String> {
        tokens.iter().map(|t| t.code()).collect()
    }

    #[test]
    fn test_single_values() {
        let decomposer = DurationDecomposer::default();
        assert_eq!(codes(&decomposer.decompose(4.0).unwrap()), vec!["w"]);
        assert_eq!(codes(&decomposer.decompose(1.0).unwrap()), vec!["q"]);
        assert_eq!(codes(&decomposer.decompose(0.0625).unwrap()), vec!["64"]);
    }

    #[test]
    fn test_dotted_values() {
        let decomposer = DurationDecomposer::default();
        assert_eq!(codes(&decomposer.decompose(3.0).unwrap()), vec!["hd"]);
        assert_eq!(codes(&decomposer.decompose(0.75).unwrap()), vec!["8d"]);
    }

    #[test]
    fn test_compound_duration_largest_first() {
        let decomposer = DurationDecomposer::default();
        assert_eq!(codes(&decomposer.decompose(5.0).unwrap()), vec!["w", "q"]);
        assert_eq!(codes(&decomposer.decompose(4.5).unwrap()), vec!["w", "8"]);
    }

    #[test]
    fn test_triplet_fraction() {
        let decomposer = DurationDecomposer::default();
        assert_eq!(codes(&decomposer.decompose(1.0 / 3.0).unwrap()), vec!["8t"]);
        assert_eq!(codes(&decomposer.decompose(2.0 / 3.0).unwrap()), vec!["qt"]);
        assert_eq!(codes(&decomposer.decompose(1.0 + 1.0 / 3.0).unwrap()), vec!["ht"]);
    }

    #[test]
    fn test_sum_is_exact() {
        let decomposer = DurationDecomposer::default();
        for beats in [0.25, 1.75, 2.5, 3.5, 6.0, 7.0, 2.0 / 3.0 + 0.5, 11.0] {
            let tokens = decomposer.decompose(beats).unwrap();
            let sum: f64 = tokens.iter().map(|t| t.beats_f64()).sum();
            assert_eq!(round_beat(sum), round_beat(beats), "beats {}", beats);
        }
    }

    #[test]
    fn test_without_dots() {
        let decomposer = DurationDecomposer::new(DecompositionSettings {
            allow_dotted: false,
            allow_triplets: true,
        });
        assert_eq!(codes(&decomposer.decompose(3.0).unwrap()), vec!["h", "q"]);
    }

    #[test]
    fn test_without_triplets_rejects_thirds() {
        let decomposer = DurationDecomposer::new(DecompositionSettings {
            allow_dotted: true,
            allow_triplets: false,
        });
        assert_eq!(
            decomposer.decompose(1.0 / 3.0),
            Err(SequenceError::InvalidDuration(1.0 / 3.0))
        );
    }

    #[test]
    fn test_zero_and_invalid() {
        let decomposer = DurationDecomposer::default();
        assert!(decomposer.decompose(0.0).unwrap().is_empty());
        assert!(decomposer.decompose(-1.0).is_err());
        assert!(decomposer.decompose(f64::NAN).is_err());
        // 1/48 beat is below the smallest value
        assert!(decomposer.decompose(1.0 / 48.0).is_err());
        // 0.3 beats is off the grid
        assert!(decomposer.decompose(0.3).is_err());
    }

    #[test]
    fn test_long_durations_use_whole_note_runs() {
        let decomposer = DurationDecomposer::default();
        let tokens = decomposer.decompose(1e6).unwrap();
        let sum: f64 = tokens.iter().map(|t| t.beats_f64()).sum();
        assert_eq!(sum, 1e6);
        assert_eq!(tokens[0], DurationToken::dotted(NoteValue::Whole));
        assert!(tokens.len() <= 1e6 as usize / 6 + 2);
    }

    #[test]
    fn test_durations_beyond_tick_range_are_rejected() {
        let decomposer = DurationDecomposer::default();
        assert_eq!(decomposer.decompose(1e20), Err(SequenceError::InvalidDuration(1e20)));
        assert!(decomposer.decompose_partial(1e20).is_err());
    }

    #[test]
    fn test_partial_decomposition_keeps_leftover() {
        let decomposer = DurationDecomposer::default();
        let (tokens, leftover) = decomposer.decompose_partial(3.4).unwrap();
        let sum: f64 = tokens.iter().map(|t| t.beats_f64()).sum();
        assert!(leftover > 0.0 && leftover < 1.0 / 24.0);
        assert_eq!(round_beat(sum + leftover), 3.4);

        let (tokens, leftover) = decomposer.decompose_partial(1.5).unwrap();
        assert_eq!(codes(&tokens), vec!["qd"]);
        assert_eq!(leftover, 0.0);
    }

    #[test]
    fn test_code_round_trip_parsing() {
        assert_eq!(DurationToken::from_code("qd").unwrap(), DurationToken::dotted(NoteValue::Quarter));
        assert_eq!(DurationToken::from_code("8t").unwrap(), DurationToken::triplet(NoteValue::Eighth));
        assert_eq!(DurationToken::from_code("16").unwrap().beats(), Rational32::new(1, 4));
        assert_eq!(DurationToken::from_code("hdd").unwrap().beats(), Rational32::new(7, 2));
        assert!(DurationToken::from_code("x").is_err());
    }
}
