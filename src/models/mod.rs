//! Note data types
//!
//! - `note`: `NoteEvent` with its tie/tuplet annotations
//! - `pitch`: spelled pitch ("Db/4")
//! - `time_signature`: meter used for bar boundaries ("6/8")

pub mod note;
pub mod pitch;
pub mod time_signature;

pub use note::{NoteEvent, TieState, TupletState};
pub use pitch::Pitch;
pub use time_signature::TimeSignature;
