//! Rhythm primitives
//!
//! - **beat**: shared 1e-6 beat rounding
//! - **duration**: decomposition of beat durations into canonical note values

pub mod beat;
pub mod duration;

pub use beat::{beats_equal, round_beat};
pub use duration::{DecompositionSettings, DurationDecomposer, DurationToken, NoteValue, DIVISIONS_PER_BEAT};
