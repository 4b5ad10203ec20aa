//! Pitch representation
//!
//! Pitches are written the way the rendering collaborator spells them:
//! step letter, accidentals, slash, octave ("C/4", "Db/4", "F##/5").

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SequenceError;

const STEP_NAMES: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

/// Musical pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    /// Scale degree (0=C, 1=D, 2=E, 3=F, 4=G, 5=A, 6=B)
    pub step: u8,

    /// Accidental (-2=double flat, -1=flat, 0=natural, +1=sharp, +2=double sharp)
    pub alteration: i8,

    /// Octave number (4 = middle C octave)
    pub octave: i8,
}

impl Pitch {
    /// Create a new pitch with validation
    pub fn new(step: u8, alteration: i8, octave: i8) -> Result<Self, SequenceError> {
        if step > 6 {
            return Err(SequenceError::Parse(format!("Invalid step: {} (must be 0-6)", step)));
        }
        if !(-2..=2).contains(&alteration) {
            return Err(SequenceError::Parse(format!(
                "Invalid alteration: {} (must be -2 to +2)",
                alteration
            )));
        }
        if !(-1..=9).contains(&octave) {
            return Err(SequenceError::Parse(format!("Invalid octave: {} (must be -1 to 9)", octave)));
        }
        Ok(Self { step, alteration, octave })
    }

    fn accidental(&self) -> &'static str {
        match self.alteration {
            -2 => "bb",
            -1 => "b",
            1 => "#",
            2 => "##",
            _ => "",
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", STEP_NAMES[self.step as usize], self.accidental(), self.octave)
    }
}

impl FromStr for Pitch {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, octave) = s
            .split_once('/')
            .ok_or_else(|| SequenceError::Parse(format!("pitch '{}' has no octave", s)))?;

        let mut chars = name.chars();
        let letter = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .ok_or_else(|| SequenceError::Parse(format!("empty pitch name in '{}'", s)))?;
        let step = STEP_NAMES
            .iter()
            .position(|&c| c == letter)
            .ok_or_else(|| SequenceError::Parse(format!("unknown step '{}' in '{}'", letter, s)))?;

        let alteration = match chars.as_str() {
            "" | "n" => 0,
            "#" => 1,
            "##" => 2,
            "b" => -1,
            "bb" => -2,
            other => {
                return Err(SequenceError::Parse(format!("unknown accidental '{}' in '{}'", other, s)))
            }
        };

        let octave: i8 = octave
            .trim()
            .parse()
            .map_err(|_| SequenceError::Parse(format!("invalid octave in '{}'", s)))?;

        Pitch::new(step as u8, alteration, octave)
    }
}
