//! Time signatures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SequenceError;

/// Time signature such as 4/4 or 6/8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    /// Numerator
    pub beats: u32,
    /// Denominator (power of two)
    pub beat_type: u32,
}

impl TimeSignature {
    pub fn new(beats: u32, beat_type: u32) -> Result<Self, SequenceError> {
        if beats == 0 {
            return Err(SequenceError::Parse("Time signature numerator must be > 0".to_string()));
        }
        if beat_type == 0 || !beat_type.is_power_of_two() || beat_type > 64 {
            return Err(SequenceError::Parse(format!(
                "Time signature denominator {} must be a power of two up to 64",
                beat_type
            )));
        }
        Ok(Self { beats, beat_type })
    }

    /// Bar length in quarter-note beats (6/8 → 3.0)
    pub fn quarter_beats(&self) -> f64 {
        (self.beats * 4) as f64 / self.beat_type as f64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self { beats: 4, beat_type: 4 }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_type)
    }
}

impl FromStr for TimeSignature {
    type Err = SequenceError;

    /// Parse "4/4", "6/8", ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 {
            return Err(SequenceError::Parse(format!("Invalid time signature '{}'", s)));
        }
        let beats = parts[0]
            .trim()
            .parse()
            .map_err(|_| SequenceError::Parse(format!("Invalid numerator in '{}'", s)))?;
        let beat_type = parts[1]
            .trim()
            .parse()
            .map_err(|_| SequenceError::Parse(format!("Invalid denominator in '{}'", s)))?;
        TimeSignature::new(beats, beat_type)
    }
}
