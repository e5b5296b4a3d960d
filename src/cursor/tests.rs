use super::*;

#[test]
fn single_cursor_has_no_selection() {
    let c = Cursor::at(5);
    assert!(!c.has_selection());
    assert_eq!(c.start(), 5);
    assert_eq!(c.end(), 5);
}

#[test]
fn start_end_respect_direction() {
    let forward = Cursor { head: 10, anchor: 3, ..Cursor::at(0) };
    assert_eq!(forward.start(), 3);
    assert_eq!(forward.end(), 10);
    assert!(forward.is_forward());

    let backward = Cursor { head: 3, anchor: 10, ..Cursor::at(0) };
    assert_eq!(backward.start(), 3);
    assert_eq!(backward.end(), 10);
    assert!(!backward.is_forward());
}

#[test]
fn collapse_to_head_clears_selection_and_virtual_space() {
    let mut c = Cursor { head: 8, anchor: 2, virtual_space: true, ..Cursor::at(0) };
    c.collapse_to_head();
    assert_eq!(c.anchor, 8);
    assert!(!c.virtual_space);
}

#[test]
fn shift_offset_insert_moves_positions_after_point() {
    assert_eq!(shift_offset(0, 5, 3), 0);
    assert_eq!(shift_offset(5, 5, 3), 5);
    assert_eq!(shift_offset(6, 5, 3), 9);
}

#[test]
fn shift_offset_erase_clamps_consumed_range() {
    // erase(5, 3) removes [5, 8)
    assert_eq!(shift_offset(4, 5, -3), 4);
    assert_eq!(shift_offset(5, 5, -3), 5);
    assert_eq!(shift_offset(7, 5, -3), 5);
    assert_eq!(shift_offset(8, 5, -3), 5);
    assert_eq!(shift_offset(9, 5, -3), 6);
}

#[test]
fn single_set_is_never_empty_or_rectangular() {
    let set = CursorSet::single(4);
    assert_eq!(set.len(), 1);
    assert!(!set.is_multi());
    assert!(!set.is_rectangular());
}

#[test]
fn rectangular_flag_requires_multi() {
    let set = CursorSet::new(vec![Cursor::at(1)], true);
    assert!(!set.is_rectangular(), "single cursor can't be rectangular");

    let multi = CursorSet::new(vec![Cursor::at(1), Cursor::at(5)], true);
    assert!(multi.is_rectangular());
}

#[test]
#[should_panic(expected = "non-empty")]
fn new_panics_on_empty() {
    let _ = CursorSet::new(Vec::new(), false);
}

#[test]
fn descending_indices_orders_by_start_descending() {
    let set = CursorSet::new(
        vec![Cursor::at(3), Cursor::at(10), Cursor::at(1)],
        false,
    );
    assert_eq!(set.descending_indices(), vec![1, 0, 2]);
}

#[test]
fn merge_overlapping_coalesces_touching_ranges() {
    let mut set = CursorSet::new(
        vec![
            Cursor { head: 5, anchor: 2, ..Cursor::at(0) },
            Cursor { head: 8, anchor: 5, ..Cursor::at(0) },
            Cursor::at(20),
        ],
        false,
    );
    set.merge_overlapping();
    assert_eq!(set.len(), 2);
    assert_eq!(set.cursors()[0].start(), 2);
    assert_eq!(set.cursors()[0].end(), 8);
    assert_eq!(set.cursors()[1], Cursor::at(20));
}

#[test]
fn merge_overlapping_leaves_disjoint_cursors_alone() {
    let mut set = CursorSet::new(vec![Cursor::at(1), Cursor::at(50)], false);
    set.merge_overlapping();
    assert_eq!(set.len(), 2);
}

#[test]
fn shift_for_edit_pins_owner_and_shifts_others() {
    let mut set = CursorSet::new(
        vec![Cursor::at(2), Cursor::at(10), Cursor::at(20)],
        false,
    );
    // owner (index 1) typed "xyz" at position 10.
    set.shift_for_edit(1, 10, 3, 13, 13);
    assert_eq!(set.cursors()[0].head, 2); // before edit point, untouched
    assert_eq!(set.cursors()[1].head, 13); // owner pinned to outcome
    assert_eq!(set.cursors()[2].head, 23); // after edit point, shifted
}

#[test]
fn shift_all_applies_uniformly() {
    let mut set = CursorSet::new(vec![Cursor::at(5), Cursor::at(15)], true);
    set.shift_all(0, 2);
    assert_eq!(set.cursors()[0].head, 7);
    assert_eq!(set.cursors()[1].head, 17);
}
