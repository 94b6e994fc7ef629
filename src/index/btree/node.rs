//! Node - one page of the B-tree, held in the tree's arena.
//!
//! A [`Node`] owns its ordered entries and the ids of its children. It
//! knows nothing about its neighbours beyond the `parent` back-reference;
//! every operation that touches more than one node lives on the tree.

use crate::common::NodeId;

/// A single B-tree node.
///
/// # Layout
/// ```text
///              entries:   [ k0 | k1 | k2 ]
///              children: [c0 | c1 | c2 | c3]
/// keys(c0) < k0 < keys(c1) < k1 < keys(c2) < k2 < keys(c3)
/// ```
///
/// Leaves have no children. Internal nodes always carry
/// `entries.len() + 1` children once a public operation has returned.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    /// True if this node has no children.
    pub(crate) is_leaf: bool,

    /// Key/value pairs, strictly increasing by key.
    pub(crate) entries: Vec<(K, V)>,

    /// Child ids; empty for leaves.
    pub(crate) children: Vec<NodeId>,

    /// Non-owning link to the node holding this one, `None` for the root.
    pub(crate) parent: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// Create an empty leaf.
    pub(crate) fn leaf(parent: Option<NodeId>) -> Self {
        Self {
            is_leaf: true,
            entries: Vec::new(),
            children: Vec::new(),
            parent,
        }
    }

    /// Create an internal node with no entries wrapping `children`.
    ///
    /// Used for root growth: the caller immediately splits child 0.
    pub(crate) fn internal(children: Vec<NodeId>) -> Self {
        Self {
            is_leaf: false,
            entries: Vec::new(),
            children,
            parent: None,
        }
    }

    #[inline]
    pub(crate) fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// True if the node holds `2m + 1` entries or more and must be split.
    #[inline]
    pub(crate) fn is_overfull(&self, min_degree: usize) -> bool {
        self.entries.len() > 2 * min_degree
    }

    /// True if the node holds fewer than `m` entries.
    ///
    /// Meaningless for the root, which callers exempt separately.
    #[inline]
    pub(crate) fn is_deficient(&self, min_degree: usize) -> bool {
        self.entries.len() < min_degree
    }

    /// True if the node can give one entry to a sibling and stay legal.
    #[inline]
    pub(crate) fn can_lend(&self, min_degree: usize) -> bool {
        self.entries.len() > min_degree
    }

    /// Position of `child` among this node's children.
    pub(crate) fn child_index(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }
}

impl<K: Ord, V> Node<K, V> {
    /// Index of the first entry whose key is `>= key`.
    ///
    /// Equal to `entry_count()` when every key is smaller.
    #[inline]
    pub(crate) fn find_key_index(&self, key: &K) -> usize {
        self.entries.partition_point(|(k, _)| k < key)
    }

    /// Insert into a leaf, keeping entries sorted.
    ///
    /// The caller rejects duplicates before reaching the leaf.
    pub(crate) fn insert_sorted(&mut self, key: K, value: V) {
        let idx = self.entries.partition_point(|(k, _)| *k < key);
        self.entries.insert(idx, (key, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_with(keys: &[i32]) -> Node<i32, ()> {
        let mut node = Node::leaf(None);
        for &k in keys {
            node.insert_sorted(k, ());
        }
        node
    }

    #[test]
    fn test_insert_sorted_keeps_order() {
        let node = leaf_with(&[15, 3, 8, 23, 1]);
        let keys: Vec<i32> = node.entries.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 3, 8, 15, 23]);
    }

    #[test]
    fn test_find_key_index() {
        let node = leaf_with(&[10, 20, 30]);
        assert_eq!(node.find_key_index(&5), 0);
        assert_eq!(node.find_key_index(&10), 0);
        assert_eq!(node.find_key_index(&15), 1);
        assert_eq!(node.find_key_index(&30), 2);
        assert_eq!(node.find_key_index(&99), 3);
    }

    #[test]
    fn test_occupancy_predicates() {
        // m = 2: legal range is 2..=4
        let node = leaf_with(&[1]);
        assert!(node.is_deficient(2));
        assert!(!node.can_lend(2));

        let node = leaf_with(&[1, 2, 3]);
        assert!(!node.is_deficient(2));
        assert!(node.can_lend(2));
        assert!(!node.is_overfull(2));

        let node = leaf_with(&[1, 2, 3, 4, 5]);
        assert!(node.is_overfull(2));
    }

    #[test]
    fn test_child_index() {
        let node: Node<i32, ()> = Node::internal(vec![NodeId::new(4), NodeId::new(9)]);
        assert_eq!(node.child_index(NodeId::new(9)), Some(1));
        assert_eq!(node.child_index(NodeId::new(3)), None);
        assert!(!node.is_leaf);
    }
}
