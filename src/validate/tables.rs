//! Transition tables and annotation strategies for ties and tuplets

use super::{Annotation, TransitionTable};
use crate::models::{NoteEvent, TieState, TupletState};

/// Tuplet chain: start → middle → stop
pub static TUPLET_TRANSITIONS: TransitionTable<TupletState> = TransitionTable {
    none: TupletState::None,
    allowed: &[
        (TupletState::None, &[TupletState::None, TupletState::Start]),
        (TupletState::Start, &[TupletState::Middle]),
        (TupletState::Middle, &[TupletState::Stop]),
        (TupletState::Stop, &[TupletState::Start, TupletState::None]),
    ],
};

/// Tie chain: start → (stop_start)* → stop
pub static TIE_TRANSITIONS: TransitionTable<TieState> = TransitionTable {
    none: TieState::None,
    allowed: &[
        (TieState::None, &[TieState::None, TieState::Start]),
        (TieState::Start, &[TieState::Stop, TieState::StopStart]),
        (TieState::StopStart, &[TieState::Stop, TieState::StopStart]),
        (TieState::Stop, &[TieState::Start, TieState::None]),
    ],
};

pub struct TieAnnotation;

impl Annotation for TieAnnotation {
    type Tag = TieState;
    const NAME: &'static str = "tie";

    fn table() -> &'static TransitionTable<TieState> {
        &TIE_TRANSITIONS
    }

    fn read_tag(note: &NoteEvent) -> TieState {
        note.tie()
    }

    fn clear(note: &mut NoteEvent) {
        note.remove_tie();
    }
}

pub struct TupletAnnotation;

impl Annotation for TupletAnnotation {
    type Tag = TupletState;
    const NAME: &'static str = "tuplet";

    fn table() -> &'static TransitionTable<TupletState> {
        &TUPLET_TRANSITIONS
    }

    fn read_tag(note: &NoteEvent) -> TupletState {
        note.tuplet()
    }

    fn clear(note: &mut NoteEvent) {
        note.remove_tuplet();
    }
}
