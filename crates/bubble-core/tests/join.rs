// File: crates/bubble-core/tests/join.rs
// Purpose: Positional and keyed enter/update/exit joins, including repeated keys.

use bubble_core::{join_by_index, join_by_key, Element, NodeId, Surface};

fn nodes(n: usize) -> (Surface, Vec<NodeId>) {
    let mut surface = Surface::new();
    let root = surface.root();
    let ids = (0..n).map(|_| surface.append(root, Element::Group, "n")).collect();
    (surface, ids)
}

#[test]
fn positional_join_splits_at_the_shorter_length() {
    let (_, ids) = nodes(3);

    let grow = join_by_index(&ids, 5);
    assert_eq!(grow.update, vec![(0, ids[0]), (1, ids[1]), (2, ids[2])]);
    assert_eq!(grow.enter, vec![3, 4]);
    assert!(grow.exit.is_empty());

    let shrink = join_by_index(&ids, 1);
    assert_eq!(shrink.update, vec![(0, ids[0])]);
    assert!(shrink.enter.is_empty());
    assert_eq!(shrink.exit, vec![ids[1], ids[2]]);
}

#[test]
fn keyed_join_matches_regardless_of_order() {
    let (_, ids) = nodes(3);
    let existing = [(ids[0], "a"), (ids[1], "b"), (ids[2], "c")];

    let join = join_by_key(&existing, &["c", "d", "a"]);
    assert_eq!(join.update, vec![(0, ids[2]), (2, ids[0])]);
    assert_eq!(join.enter, vec![1]);
    assert_eq!(join.exit, vec![ids[1]]);
}

#[test]
fn repeated_node_key_exits_the_later_node() {
    let (_, ids) = nodes(3);
    let existing = [(ids[0], "a"), (ids[1], "a"), (ids[2], "b")];

    let join = join_by_key(&existing, &["a", "b"]);
    assert_eq!(join.update, vec![(0, ids[0]), (1, ids[2])]);
    assert!(join.enter.is_empty());
    assert_eq!(join.exit, vec![ids[1]]);
}

#[test]
fn repeated_data_key_enters_the_later_datum() {
    let (_, ids) = nodes(1);
    let existing = [(ids[0], "a")];

    let join = join_by_key(&existing, &["a", "a", "b"]);
    assert_eq!(join.update, vec![(0, ids[0])]);
    assert_eq!(join.enter, vec![1, 2]);
    assert!(join.exit.is_empty());
}
