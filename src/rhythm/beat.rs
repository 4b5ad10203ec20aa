//! Beat rounding
//!
//! Tuplet durations are non-terminating fractions, so sums of them drift
//! (12.9999999 instead of 13). Every beat comparison in the crate goes
//! through `round_beat` first.

/// Rounding precision for beats and durations
pub const BEAT_PRECISION: f64 = 1_000_000.0;

/// Round a beat or duration to 1e-6
pub fn round_beat(beat: f64) -> f64 {
    (beat * BEAT_PRECISION).round() / BEAT_PRECISION
}

/// Compare two beats after rounding both
pub fn beats_equal(a: f64, b: f64) -> bool {
    round_beat(a) == round_beat(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_absorbs_triplet_drift() {
        let third = 1.0 / 3.0;
        let sum = 12.0 + third + third + third;
        assert_eq!(round_beat(sum), 13.0);
    }

    #[test]
    fn test_round_keeps_precision() {
        assert_eq!(round_beat(1.125), 1.125);
        assert_eq!(round_beat(0.3333333333), 0.333333);
    }

    #[test]
    fn test_beats_equal() {
        assert!(beats_equal(2.0 / 3.0 * 3.0, 2.0));
        assert!(!beats_equal(1.0, 1.00001));
    }
}
