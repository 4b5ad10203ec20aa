//! Note and rest events
//!
//! A `NoteEvent` is one note or rest: a duration in quarter-note beats,
//! an optional pitch (absent for rests) and tie/tuplet annotations.
//!
//! Compact token format:
//! - note: `<pitch>:<duration>` e.g. `"Db/4:q"`, `"C/5:8t"`, `"G/4:1.25"`
//! - rest: `<duration>r` e.g. `"hr"`, `"qdr"`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pitch::Pitch;
use crate::error::{Result, SequenceError};
use crate::rhythm::beat::round_beat;
use crate::rhythm::duration::{DurationDecomposer, DurationToken};

/// Tie annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieState {
    #[default]
    None,
    Start,
    Stop,
    /// Ends one tie and begins another on the same note
    StopStart,
}

/// Tuplet annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TupletState {
    #[default]
    None,
    Start,
    Middle,
    Stop,
}

/// One note or rest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Duration in quarter-note beats
    duration: f64,
    /// None for rests
    pitch: Option<Pitch>,
    #[serde(default)]
    tie: TieState,
    #[serde(default)]
    tuplet: TupletState,
}

fn check_duration(beats: f64) -> Result<f64> {
    if !beats.is_finite() || round_beat(beats) <= 0.0 {
        return Err(SequenceError::InvalidNote(format!(
            "duration must be a positive number of beats, got {}",
            beats
        )));
    }
    Ok(beats)
}

impl NoteEvent {
    /// Pitched note of `beats` duration
    pub fn note(pitch: Pitch, beats: f64) -> Result<Self> {
        Ok(NoteEvent {
            duration: check_duration(beats)?,
            pitch: Some(pitch),
            tie: TieState::None,
            tuplet: TupletState::None,
        })
    }

    /// Rest of `beats` duration
    pub fn rest(beats: f64) -> Result<Self> {
        Ok(NoteEvent {
            duration: check_duration(beats)?,
            pitch: None,
            tie: TieState::None,
            tuplet: TupletState::None,
        })
    }

    /// Note or rest taking its duration from a canonical token
    pub fn from_duration_token(token: &DurationToken, pitch: Option<Pitch>) -> Self {
        NoteEvent {
            duration: token.beats_f64(),
            pitch,
            tie: TieState::None,
            tuplet: TupletState::None,
        }
    }

    /// Parse a compact token (`"Db/4:q"`, `"hr"`)
    pub fn from_token(token: &str) -> Result<Self> {
        token.parse()
    }

    pub fn with_tie(mut self, tie: TieState) -> Self {
        self.tie = tie;
        self
    }

    pub fn with_tuplet(mut self, tuplet: TupletState) -> Self {
        self.tuplet = tuplet;
        self
    }

    /// Check the NoteEvent contract (positive finite duration)
    pub fn validate(&self) -> Result<()> {
        check_duration(self.duration).map(|_| ())
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn set_duration_by_beats(&mut self, beats: f64) -> Result<()> {
        self.duration = check_duration(beats)?;
        Ok(())
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }

    pub fn pitch(&self) -> Option<&Pitch> {
        self.pitch.as_ref()
    }

    pub fn tie(&self) -> TieState {
        self.tie
    }

    pub fn is_tie(&self, tie: TieState) -> bool {
        self.tie == tie
    }

    pub fn set_tie(&mut self, tie: TieState) {
        self.tie = tie;
    }

    pub fn remove_tie(&mut self) {
        self.tie = TieState::None;
    }

    pub fn tuplet(&self) -> TupletState {
        self.tuplet
    }

    pub fn set_tuplet(&mut self, tuplet: TupletState) {
        self.tuplet = tuplet;
    }

    pub fn remove_tuplet(&mut self) {
        self.tuplet = TupletState::None;
    }

    /// Duration as a single token code when it is one, else the beat count
    fn duration_code(&self) -> String {
        match DurationDecomposer::default().decompose(self.duration) {
            Ok(tokens) if tokens.len() == 1 => tokens[0].code(),
            _ => format!("{}", round_beat(self.duration)),
        }
    }
}

fn parse_duration(code: &str) -> Result<f64> {
    if let Ok(token) = DurationToken::from_code(code) {
        return Ok(token.beats_f64());
    }
    code.parse::<f64>()
        .map_err(|_| SequenceError::Parse(format!("invalid duration '{}'", code)))
}

impl FromStr for NoteEvent {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((pitch, duration)) => NoteEvent::note(pitch.parse()?, parse_duration(duration)?),
            None => {
                let duration = s
                    .strip_suffix('r')
                    .ok_or_else(|| SequenceError::Parse(format!("token '{}' is neither note nor rest", s)))?;
                NoteEvent::rest(parse_duration(duration)?)
            }
        }
    }
}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pitch {
            Some(pitch) => write!(f, "{}:{}", pitch, self.duration_code()),
            None => write!(f, "{}r", self.duration_code()),
        }
    }
}
