//! WASM API test
//!
//! Exercises the exported functions against the WASM-owned sequence.
//! Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use leadsheet_notes_wasm::api::*;
use leadsheet_notes_wasm::{NoteRecord, RestArea};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn record(duration: f64, pitch: Option<&str>) -> NoteRecord {
    NoteRecord {
        duration,
        pitch: pitch.map(str::to_string),
        rest: pitch.is_none(),
        tie: None,
        tuplet: None,
    }
}

fn load(records: &[NoteRecord]) -> usize {
    let value = serde_wasm_bindgen::to_value(records).unwrap();
    load_notes(value, JsValue::UNDEFINED).unwrap()
}

fn bars(signatures: &[&str]) -> JsValue {
    serde_wasm_bindgen::to_value(signatures).unwrap()
}

#[wasm_bindgen_test]
fn test_load_and_query() {
    let total = load(&[record(1.0, Some("C/4")), record(2.0, None), record(1.0, Some("E/4"))]);
    assert_eq!(total, 3);
    assert_eq!(get_total().unwrap(), 3);
    assert_eq!(get_total_duration().unwrap(), 4.0);
    assert_eq!(get_note_beat(2).unwrap(), 4.0);
    assert!(get_note_beat(3).is_err());
}

#[wasm_bindgen_test]
fn test_splice_and_delete() {
    load(&[record(1.0, Some("C/4")), record(1.0, Some("D/4"))]);

    let pasted = serde_wasm_bindgen::to_value(&[record(0.5, Some("G/4"))]).unwrap();
    let removed = splice_notes(1, 0, pasted).unwrap();
    let removed: Vec<NoteRecord> = serde_wasm_bindgen::from_value(removed).unwrap();
    assert!(removed.is_empty());
    assert_eq!(get_total().unwrap(), 3);

    let deleted: NoteRecord = serde_wasm_bindgen::from_value(delete_note(1).unwrap()).unwrap();
    assert_eq!(deleted.pitch.as_deref(), Some("G/4"));
    assert!(delete_note(5).is_err());
}

#[wasm_bindgen_test]
fn test_rest_areas_and_bars() {
    load(&[
        record(1.0, None),
        record(1.0, Some("C/4")),
        record(1.0, Some("D/4")),
        record(1.0, None),
        record(4.0, Some("E/4")),
    ]);

    let areas: Vec<RestArea> = serde_wasm_bindgen::from_value(find_rest_areas(1, 2).unwrap()).unwrap();
    assert_eq!(areas, vec![RestArea { start: 0, end: 0 }, RestArea { start: 3, end: 3 }]);

    let bar: Vec<NoteRecord> =
        serde_wasm_bindgen::from_value(get_notes_at_bar(1, bars(&["4/4", "4/4"])).unwrap()).unwrap();
    assert_eq!(bar.len(), 1);
    assert!(get_notes_at_bar(1, JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn test_adapt_leaves_stored_sequence() {
    load(&[record(4.0, Some("C/4"))]);
    let adapted: Vec<NoteRecord> =
        serde_wasm_bindgen::from_value(adapt_to_time_signature("3/4", None).unwrap()).unwrap();
    assert_eq!(adapted.len(), 3);
    assert_eq!(get_total().unwrap(), 1);
    assert!(adapt_to_time_signature("3/5", None).is_err());
}

#[wasm_bindgen_test]
fn test_revise_notes() {
    let mut dangling = record(1.0, Some("C/4"));
    dangling.tie = Some(leadsheet_notes_wasm::TieState::Start);
    load(&[dangling, record(1.0, None)]);

    assert!(revise_notes().is_ok());
    let notes: Vec<NoteRecord> = serde_wasm_bindgen::from_value(export_notes().unwrap()).unwrap();
    assert_eq!(notes[0].tie, None);
}

#[wasm_bindgen_test]
fn test_revise_ties_pitch_is_separate() {
    let mut start = record(1.0, Some("C/4"));
    start.tie = Some(leadsheet_notes_wasm::TieState::Start);
    let mut stop = record(1.0, Some("D/4"));
    stop.tie = Some(leadsheet_notes_wasm::TieState::Stop);
    load(&[start, stop]);

    assert!(revise_notes().is_ok());
    let notes: Vec<NoteRecord> = serde_wasm_bindgen::from_value(export_notes().unwrap()).unwrap();
    assert_eq!(notes[0].tie, Some(leadsheet_notes_wasm::TieState::Start));

    revise_ties_pitch().unwrap();
    let notes: Vec<NoteRecord> = serde_wasm_bindgen::from_value(export_notes().unwrap()).unwrap();
    assert_eq!(notes[0].tie, None);
    assert_eq!(notes[1].tie, None);
}
