//! Lead sheet note sequence WASM module
//!
//! Ordered notes and rests of one melody, addressed by index or by
//! 1-based beat, with splice editing, tie/tuplet consistency repair,
//! rest-area lookup and re-segmentation into a time signature.

pub mod error;
pub mod models;
pub mod rhythm;
pub mod validate;
pub mod sequence;
pub mod interchange;
pub mod diagnostics;
pub mod api;

// Re-export commonly used types
pub use error::{Result, SequenceError};
pub use interchange::NoteRecord;
pub use models::{NoteEvent, Pitch, TieState, TimeSignature, TupletState};
pub use rhythm::{DecompositionSettings, DurationDecomposer, DurationToken, NoteValue};
pub use sequence::{BarContext, BarLayout, NoteSequence, RestArea, Revision};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    init_logger();

    log::info!("Note sequence WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logger() {
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        api::helpers::log_warn(&format!("Logger already initialized: {}", e));
    }
}
