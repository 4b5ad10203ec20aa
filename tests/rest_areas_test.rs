// Rest areas around an edited range

use leadsheet_notes_wasm::{NoteEvent, NoteSequence, RestArea};

/// `'r'` is a rest, any other char a pitched quarter note
fn make_pattern(pattern: &str) -> NoteSequence {
    let notes = pattern
        .chars()
        .map(|c| {
            let token = if c == 'r' { "qr" } else { "A/4:q" };
            NoteEvent::from_token(token).unwrap()
        })
        .collect();
    NoteSequence::from_notes(notes).unwrap()
}

fn area(start: usize, end: usize) -> RestArea {
    RestArea { start, end }
}

#[test]
fn test_rests_on_both_sides_of_pitched_selection() {
    // 0 1 2 3 4 5 6 7 8 9
    // n n r r n r n r r n
    let seq = make_pattern("nnrrnrnrrn");
    assert_eq!(seq.find_rest_areas(4, 6).unwrap(), vec![area(2, 3), area(7, 8)]);
}

#[test]
fn test_selection_starting_on_rests_joins_left_run() {
    let seq = make_pattern("nnrrrrnrrn");
    assert_eq!(seq.find_rest_areas(4, 6).unwrap(), vec![area(2, 5), area(7, 8)]);
}

#[test]
fn test_selection_ending_on_rests_joins_right_run() {
    let seq = make_pattern("nnrrnnrrrn");
    assert_eq!(seq.find_rest_areas(4, 6).unwrap(), vec![area(2, 3), area(6, 8)]);
}

#[test]
fn test_everything_rest_merges_into_one_area() {
    let seq = make_pattern("nrrrrrrrrn");
    assert_eq!(seq.find_rest_areas(3, 6).unwrap(), vec![area(1, 8)]);
}

#[test]
fn test_areas_at_sequence_edges() {
    let seq = make_pattern("rrnn");
    assert_eq!(seq.find_rest_areas(0, 1).unwrap(), vec![area(0, 1)]);
    assert_eq!(seq.find_rest_areas(2, 3).unwrap(), vec![area(0, 1)]);
    assert!(make_pattern("nnnn").find_rest_areas(0, 3).unwrap().is_empty());
}
