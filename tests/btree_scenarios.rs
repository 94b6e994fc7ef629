//! Integration tests for the B-tree index.
//!
//! These walk the public API through the fixed key sequences used to
//! exercise the tree by hand, checking shape and invariants as they go.

use bindex::{BTree, BTreeConfig, Error};

const INSERTS: [i32; 34] = [
    15, 3, 8, 23, 1, 9, 14, 18, 10, 20, 5, 6, 12, 30, 2, 4, 7, 11, 13, 16, 19, 21, 26, 28, 27,
    29, 17, 22, 25, 24, 31, 35, 33, 36,
];

const FIRST_FOURTEEN: [i32; 14] = [15, 3, 8, 23, 1, 9, 14, 18, 10, 20, 5, 6, 12, 30];

fn build(order: usize, keys: &[i32]) -> BTree<i32, String> {
    let mut tree = BTree::new(order).unwrap();
    for &k in keys {
        tree.insert(k, format!("End_{}", k)).unwrap();
        tree.validate().unwrap();
    }
    tree
}

fn sorted(keys: &[i32]) -> Vec<i32> {
    let mut keys = keys.to_vec();
    keys.sort();
    keys
}

fn keys_of(tree: &BTree<i32, String>) -> Vec<i32> {
    tree.keys().into_iter().copied().collect()
}

#[test]
fn test_construct_rejects_order_below_two() {
    assert!(matches!(BTree::<i32, i32>::new(1), Err(Error::InvalidOrder(1))));
    assert!(matches!(
        BTree::<i32, i32>::with_config(BTreeConfig::new(0)),
        Err(Error::InvalidOrder(0))
    ));
}

#[test]
fn test_five_inserts_order_three() {
    let tree = build(3, &[15, 3, 8, 23, 1]);

    assert_eq!(keys_of(&tree), vec![1, 3, 8, 15, 23]);
    let root = tree.root().unwrap();
    assert!(tree.node_entry_count(root).unwrap() <= 4);
}

#[test]
fn test_search_found_and_not_found() {
    let tree = build(3, &FIRST_FOURTEEN);

    assert_eq!(tree.search(&14).map(String::as_str), Some("End_14"));
    assert!(tree.search(&40).is_none());
}

#[test]
fn test_remove_then_search() {
    let mut tree = build(3, &FIRST_FOURTEEN);

    assert_eq!(tree.remove(&15).unwrap(), "End_15");
    assert!(tree.search(&15).is_none());

    let expected: Vec<i32> = sorted(&FIRST_FOURTEEN).into_iter().filter(|&k| k != 15).collect();
    assert_eq!(keys_of(&tree), expected);
    tree.validate().unwrap();
}

#[test]
fn test_remove_all_in_insertion_order() {
    let mut tree = build(3, &INSERTS);

    for &k in &INSERTS {
        assert_eq!(tree.remove(&k).unwrap(), format!("End_{}", k));
        tree.validate().unwrap();
    }

    assert!(tree.is_empty());
    assert!(tree.root().is_none());
    for &k in &INSERTS {
        assert!(tree.search(&k).is_none());
    }
    assert_eq!(tree.remove(&1), Err(Error::EmptyTree));
}

#[test]
fn test_full_sequence_searches() {
    let tree = build(3, &INSERTS);

    for k in [1, 14, 18, 31] {
        assert_eq!(tree.search(&k), Some(&format!("End_{}", k)));
    }
    assert!(tree.search(&40).is_none());
    assert_eq!(tree.len(), INSERTS.len());
}

#[test]
fn test_full_sequence_shape() {
    let tree = build(3, &INSERTS);

    assert_eq!(tree.height(), 3);
    assert_eq!(keys_of(&tree), sorted(&INSERTS));

    let dump = tree.dump();
    let lines: Vec<&str> = dump.lines().collect();
    assert!(!lines[0].starts_with(' '));
    assert!(lines.iter().skip(1).all(|l| l.starts_with("    ")));
}

#[test]
fn test_remove_absent_key_is_reported() {
    let mut tree = build(3, &FIRST_FOURTEEN);
    let before = keys_of(&tree);

    assert_eq!(tree.remove(&40), Err(Error::KeyNotFound));
    assert_eq!(tree.remove(&0), Err(Error::KeyNotFound));
    assert_eq!(keys_of(&tree), before);
    tree.validate().unwrap();
}

#[test]
fn test_insert_then_remove_restores_keys() {
    let mut tree = build(3, &INSERTS);
    let before = keys_of(&tree);

    tree.insert(100, "x".to_string()).unwrap();
    tree.remove(&100).unwrap();
    assert_eq!(keys_of(&tree), before);

    tree.insert(0, "x".to_string()).unwrap();
    tree.remove(&0).unwrap();
    assert_eq!(keys_of(&tree), before);
    tree.validate().unwrap();
}

#[test]
fn test_descending_and_ascending_orders() {
    for order in 2..=6 {
        let mut tree: BTree<i32, i32> = BTree::new(order).unwrap();
        for k in (0..300).rev() {
            tree.insert(k, k).unwrap();
        }
        tree.validate().unwrap();

        for k in (0..300).step_by(2) {
            assert_eq!(tree.remove(&k), Ok(k));
        }
        tree.validate().unwrap();
        assert_eq!(tree.len(), 150);

        for k in (1..300).step_by(2) {
            assert_eq!(tree.remove(&k), Ok(k));
        }
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
    }
}

#[test]
fn test_tree_is_reusable_after_emptying() {
    let mut tree = build(3, &FIRST_FOURTEEN);
    for &k in &FIRST_FOURTEEN {
        tree.remove(&k).unwrap();
    }
    assert!(tree.is_empty());

    for &k in &INSERTS {
        tree.insert(k, k.to_string()).unwrap();
    }
    tree.validate().unwrap();
    assert_eq!(tree.search(&36).map(String::as_str), Some("36"));
}

#[test]
fn test_stats_track_structure_changes() {
    let mut tree = build(3, &INSERTS);
    let grown = tree.stats().snapshot();
    assert!(grown.splits > 0);
    assert!(grown.root_splits >= 2);

    for &k in &INSERTS {
        tree.remove(&k).unwrap();
    }
    let shrunk = tree.stats().snapshot();
    assert!(shrunk.merges > 0);
    assert!(shrunk.root_collapses >= 2);
}
