//! Note sequence WASM API
//!
//! JavaScript-facing API over a WASM-owned `NoteSequence`. Notes cross the
//! boundary as `NoteRecord` objects.
//!
//! # Module Structure
//!
//! - `helpers`: console logging, serialization and error conversion
//! - `sequence`: the exported operations

pub mod helpers;
pub mod sequence;

pub use sequence::*;
