//! Exported sequence operations
//!
//! The sequence lives in WASM memory; JS loads it once with `loadNotes` and
//! then edits and queries it through these functions. Bar-relative calls take
//! the bar layout as a list of time signature strings (`["4/4", "3/4"]`).

use std::sync::Mutex;

use lazy_static::lazy_static;
use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, sequence_error, serialize};
use crate::diagnostics::{analyze_annotations, analyze_bar_fill, Diagnostics};
use crate::error::{Result, SequenceError};
use crate::interchange::NoteRecord;
use crate::models::{NoteEvent, TimeSignature};
use crate::rhythm::DecompositionSettings;
use crate::sequence::{BarLayout, NoteSequence};
use crate::{wasm_error, wasm_info, wasm_log};

// WASM-owned sequence storage (canonical source of truth)
lazy_static! {
    static ref SEQUENCE: Mutex<Option<NoteSequence>> = Mutex::new(None);
}

/// Run `f` against the loaded sequence
fn with_sequence<T>(
    operation: &str,
    f: impl FnOnce(&mut NoteSequence) -> Result<T>,
) -> std::result::Result<T, JsValue> {
    let mut guard = SEQUENCE.lock().map_err(|_| {
        wasm_error!("{}: sequence lock poisoned", operation);
        JsValue::from_str("Sequence lock poisoned")
    })?;
    let sequence = guard.as_mut().ok_or_else(|| {
        wasm_error!("{}: no sequence loaded", operation);
        JsValue::from_str("No sequence loaded")
    })?;
    f(sequence).map_err(|e| sequence_error(operation, e))
}

/// Bar layout from an optional JS array of time signature strings
fn bar_layout(operation: &str, bars: JsValue) -> std::result::Result<BarLayout, JsValue> {
    if bars.is_undefined() || bars.is_null() {
        return Err(sequence_error(operation, SequenceError::MissingContext("bar layout")));
    }
    let signatures: Vec<String> = deserialize(bars, "Bar layout deserialization error")?;
    BarLayout::parse(&signatures).map_err(|e| sequence_error(operation, e))
}

fn note_records(notes: &[NoteEvent]) -> Vec<NoteRecord> {
    notes.iter().map(NoteRecord::from).collect()
}

/// Replace the WASM-owned sequence
///
/// `settings` is optional (`{allow_dotted, allow_triplets}`).
#[wasm_bindgen(js_name = loadNotes)]
pub fn load_notes(notes: JsValue, settings: JsValue) -> std::result::Result<usize, JsValue> {
    let records: Vec<NoteRecord> = deserialize(notes, "Note deserialization error")?;
    let settings: DecompositionSettings = if settings.is_undefined() || settings.is_null() {
        DecompositionSettings::default()
    } else {
        deserialize(settings, "Settings deserialization error")?
    };

    let mut sequence = NoteSequence::with_settings(settings);
    records
        .iter()
        .map(NoteEvent::try_from)
        .collect::<Result<Vec<_>>>()
        .and_then(|notes| sequence.set_notes(notes))
        .map_err(|e| sequence_error("loadNotes", e))?;

    let total = sequence.total();
    let mut guard = SEQUENCE
        .lock()
        .map_err(|_| JsValue::from_str("Sequence lock poisoned"))?;
    *guard = Some(sequence);

    wasm_info!("loadNotes: {} notes", total);
    Ok(total)
}

/// All notes as records
#[wasm_bindgen(js_name = exportNotes)]
pub fn export_notes() -> std::result::Result<JsValue, JsValue> {
    let records = with_sequence("exportNotes", |s| Ok(s.to_records(..)))?;
    serialize(&records, "Note serialization error")
}

#[wasm_bindgen(js_name = getTotal)]
pub fn get_total() -> std::result::Result<usize, JsValue> {
    with_sequence("getTotal", |s| Ok(s.total()))
}

#[wasm_bindgen(js_name = getTotalDuration)]
pub fn get_total_duration() -> std::result::Result<f64, JsValue> {
    with_sequence("getTotalDuration", |s| Ok(s.total_duration()))
}

#[wasm_bindgen(js_name = getNoteBeat)]
pub fn get_note_beat(index: usize) -> std::result::Result<f64, JsValue> {
    with_sequence("getNoteBeat", |s| s.note_beat(index))
}

/// Replace notes `start..=end` with `notes`, returning the removed ones
///
/// `end = start - 1` inserts without removing.
#[wasm_bindgen(js_name = spliceNotes)]
pub fn splice_notes(start: usize, end: i32, notes: JsValue) -> std::result::Result<JsValue, JsValue> {
    wasm_log!("spliceNotes: [{}, {}]", start, end);
    let replacement: Vec<NoteRecord> = deserialize(notes, "Note deserialization error")?;
    let removed = with_sequence("spliceNotes", |s| {
        let replacement = NoteSequence::from_records(&replacement)?;
        let end_exclusive = usize::try_from(i64::from(end) + 1)
            .map_err(|_| SequenceError::InvalidIndex { index: start, len: s.total() })?;
        let removed = s.splice(start..end_exclusive, replacement.notes(..))?;
        Ok(note_records(&removed))
    })?;
    serialize(&removed, "Note serialization error")
}

#[wasm_bindgen(js_name = deleteNote)]
pub fn delete_note(index: usize) -> std::result::Result<JsValue, JsValue> {
    let removed = with_sequence("deleteNote", |s| s.delete_note(index).map(|n| NoteRecord::from(&n)))?;
    serialize(&removed, "Note serialization error")
}

/// Rest runs around `[start, end]` as `[{start, end}]`
#[wasm_bindgen(js_name = findRestAreas)]
pub fn find_rest_areas(start: usize, end: usize) -> std::result::Result<JsValue, JsValue> {
    let areas = with_sequence("findRestAreas", |s| s.find_rest_areas(start, end))?;
    serialize(&areas, "Rest area serialization error")
}

/// Clear ties between notes of different pitch
#[wasm_bindgen(js_name = reviseTiesPitch)]
pub fn revise_ties_pitch() -> std::result::Result<(), JsValue> {
    with_sequence("reviseTiesPitch", |s| {
        s.revise_ties_pitch();
        Ok(())
    })
}

/// Clear malformed tuplet/tie chains, returning the cleared runs
///
/// Tie pitches are not checked here; call `reviseTiesPitch` first for that.
#[wasm_bindgen(js_name = reviseNotes)]
pub fn revise_notes() -> std::result::Result<JsValue, JsValue> {
    let revision = with_sequence("reviseNotes", |s| Ok(s.revise_notes()))?;
    if !revision.is_clean() {
        wasm_info!(
            "reviseNotes: cleared {} tuplet and {} tie runs",
            revision.tuplets.len(),
            revision.ties.len()
        );
    }
    serialize(&revision, "Revision serialization error")
}

#[wasm_bindgen(js_name = getNotesAtBar)]
pub fn get_notes_at_bar(bar: usize, bars: JsValue) -> std::result::Result<JsValue, JsValue> {
    let layout = bar_layout("getNotesAtBar", bars)?;
    let notes = with_sequence("getNotesAtBar", |s| s.notes_at_bar(bar, &layout).map(note_records))?;
    serialize(&notes, "Note serialization error")
}

/// Notes fitted to `time_signature`; the stored sequence is unchanged
#[wasm_bindgen(js_name = adaptToTimeSignature)]
pub fn adapt_to_time_signature(
    time_signature: &str,
    num_bars: Option<usize>,
) -> std::result::Result<JsValue, JsValue> {
    let time_signature: TimeSignature = time_signature
        .parse()
        .map_err(|e| sequence_error("adaptToTimeSignature", e))?;
    let adapted = with_sequence("adaptToTimeSignature", |s| {
        s.adapt_to_time_signature(&time_signature, num_bars)
            .map(|adapted| adapted.to_records(..))
    })?;
    serialize(&adapted, "Note serialization error")
}

/// Annotation diagnostics, plus bar fill when a bar layout is given
#[wasm_bindgen(js_name = getDiagnostics)]
pub fn get_diagnostics(bars: JsValue) -> std::result::Result<JsValue, JsValue> {
    let layout = if bars.is_undefined() || bars.is_null() {
        None
    } else {
        Some(bar_layout("getDiagnostics", bars)?)
    };
    let diagnostics = with_sequence("getDiagnostics", |s| {
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(analyze_annotations(s));
        if let Some(layout) = &layout {
            diagnostics.extend(analyze_bar_fill(s, layout)?);
        }
        Ok(diagnostics)
    })?;
    serialize(&diagnostics, "Diagnostics serialization error")
}
