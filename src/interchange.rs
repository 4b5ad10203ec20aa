//! Plain note records for import/export
//!
//! Editors and renderers exchange notes as flat records:
//!
//! ```json
//! [{"duration": 1.0, "pitch": "Db/4", "tie": "start"},
//!  {"duration": 2.0, "rest": true}]
//! ```
//!
//! Conversion is one record per note. Annotations left out of a record are
//! `none`.

use std::ops::RangeBounds;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SequenceError};
use crate::models::{NoteEvent, Pitch, TieState, TupletState};
use crate::sequence::NoteSequence;

/// One note or rest in interchange form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NoteRecord {
    /// Quarter-note beats
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub rest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie: Option<TieState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuplet: Option<TupletState>,
}

impl TryFrom<&NoteRecord> for NoteEvent {
    type Error = SequenceError;

    fn try_from(record: &NoteRecord) -> Result<Self> {
        let note = match (&record.pitch, record.rest) {
            (Some(pitch), false) => NoteEvent::note(pitch.parse::<Pitch>()?, record.duration)?,
            (None, true) => NoteEvent::rest(record.duration)?,
            (Some(pitch), true) => {
                return Err(SequenceError::InvalidNote(format!(
                    "record is marked as rest but has pitch '{}'",
                    pitch
                )))
            }
            (None, false) => {
                return Err(SequenceError::InvalidNote(
                    "record has neither pitch nor rest flag".to_string(),
                ))
            }
        };
        Ok(note
            .with_tie(record.tie.unwrap_or_default())
            .with_tuplet(record.tuplet.unwrap_or_default()))
    }
}

impl From<&NoteEvent> for NoteRecord {
    fn from(note: &NoteEvent) -> Self {
        NoteRecord {
            duration: note.duration(),
            pitch: note.pitch().map(ToString::to_string),
            rest: note.is_rest(),
            tie: Some(note.tie()).filter(|t| *t != TieState::None),
            tuplet: Some(note.tuplet()).filter(|t| *t != TupletState::None),
        }
    }
}

impl NoteSequence {
    /// Build a sequence from records, failing on the first invalid one
    pub fn from_records(records: &[NoteRecord]) -> Result<Self> {
        let notes = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                NoteEvent::try_from(record).map_err(|e| match e {
                    SequenceError::InvalidNote(msg) => {
                        SequenceError::InvalidNote(format!("record {}: {}", i, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        NoteSequence::from_notes(notes)
    }

    /// Records for the notes in `range` (clamped like `notes`)
    pub fn to_records<R: RangeBounds<usize>>(&self, range: R) -> Vec<NoteRecord> {
        self.notes(range).iter().map(NoteRecord::from).collect()
    }

    /// Parse a JSON array of records
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<NoteRecord> =
            serde_json::from_str(json).map_err(|e| SequenceError::Interchange(e.to_string()))?;
        NoteSequence::from_records(&records)
    }

    /// Serialize every note as a JSON array of records
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_records(..)).map_err(|e| SequenceError::Interchange(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_to_note() {
        let record = NoteRecord {
            duration: 1.5,
            pitch: Some("F#/4".to_string()),
            rest: false,
            tie: Some(TieState::Start),
            tuplet: None,
        };
        let note = NoteEvent::try_from(&record).unwrap();
        assert_eq!(note.to_string(), "F#/4:qd");
        assert_eq!(note.tie(), TieState::Start);
        assert_eq!(note.tuplet(), TupletState::None);
    }

    #[test]
    fn test_record_needs_pitch_or_rest() {
        let record = NoteRecord { duration: 1.0, pitch: None, rest: false, tie: None, tuplet: None };
        assert!(matches!(NoteEvent::try_from(&record), Err(SequenceError::InvalidNote(_))));

        let both = NoteRecord { pitch: Some("C/4".to_string()), rest: true, ..record };
        assert!(matches!(NoteEvent::try_from(&both), Err(SequenceError::InvalidNote(_))));
    }

    #[test]
    fn test_json_omits_defaults() {
        let s = NoteSequence::from_notes(vec![
            NoteEvent::from_token("C/4:q").unwrap(),
            NoteEvent::from_token("hr").unwrap(),
        ])
        .unwrap();
        assert_eq!(
            s.to_json().unwrap(),
            r#"[{"duration":1.0,"pitch":"C/4"},{"duration":2.0,"rest":true}]"#
        );
    }

    #[test]
    fn test_from_json() {
        let s = NoteSequence::from_json(
            r#"[{"duration": 0.5, "pitch": "Bb/3", "tuplet": "start"},
                {"duration": 1, "rest": true}]"#,
        )
        .unwrap();
        assert_eq!(s.note_strings(), vec!["Bb/3:8", "qr"]);
        assert_eq!(s.note(0).unwrap().tuplet(), TupletState::Start);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(NoteSequence::from_json("{"), Err(SequenceError::Interchange(_))));
        assert!(matches!(
            NoteSequence::from_json(r#"[{"duration": 1.0, "pitch": "H/4"}]"#),
            Err(SequenceError::Parse(_))
        ));
        assert!(matches!(
            NoteSequence::from_json(r#"[{"duration": 0, "rest": true}]"#),
            Err(SequenceError::InvalidNote(_))
        ));
    }

    #[test]
    fn test_to_records_range() {
        let s = NoteSequence::from_json(
            r#"[{"duration":1,"rest":true},{"duration":1,"pitch":"C/4"},{"duration":1,"pitch":"D/4"}]"#,
        )
        .unwrap();
        let records = s.to_records(1..=2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pitch.as_deref(), Some("C/4"));
        assert_eq!(s.to_records(5..).len(), 0);
    }
}
