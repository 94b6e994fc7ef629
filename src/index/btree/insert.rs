//! Insertion: node splitting and the recursive insert descent.
//!
//! A node may hold `2m + 1` entries for a moment: the insert that pushes
//! it there splits it before returning. Splits are triggered in two
//! places and both are needed:
//! - before descending, when the target child is already over-full
//! - after the child call returns, when this node itself overflowed
//!   because one of its children split into it

use tracing::{debug, trace};

use crate::common::NodeId;
use crate::index::btree::node::Node;
use crate::index::btree::stats::BTreeStats;
use crate::index::btree::tree::BTree;

impl<K: Ord, V> BTree<K, V> {
    /// Insert into the subtree rooted at `id`.
    ///
    /// Returns the new root id if the root split while unwinding.
    pub(crate) fn insert_non_full(&mut self, id: NodeId, key: K, value: V) -> Option<NodeId> {
        let m = self.min_degree;

        if self.nodes[id].is_leaf {
            self.nodes[id].insert_sorted(key, value);
            if self.nodes[id].is_overfull(m) {
                return self.split_from_parent(id);
            }
            return None;
        }

        let mut slot = self.nodes[id].find_key_index(&key);
        let child = self.nodes[id].children[slot];
        if self.nodes[child].is_overfull(m) {
            self.split_child(id, slot);
            // The promoted median now sits at `slot`
            if key > self.nodes[id].entries[slot].0 {
                slot += 1;
            }
        }

        let child = self.nodes[id].children[slot];
        if let Some(new_root) = self.insert_non_full(child, key, value) {
            return Some(new_root);
        }

        if self.nodes[id].is_overfull(m) {
            return self.split_from_parent(id);
        }
        None
    }

    /// Split an over-full node through its parent, or grow a new root.
    fn split_from_parent(&mut self, id: NodeId) -> Option<NodeId> {
        match self.index_in_parent(id) {
            Some((parent, slot)) => {
                self.split_child(parent, slot);
                None
            }
            None => Some(self.grow_root(id)),
        }
    }

    /// Wrap `old_root` in a fresh internal root and split it.
    pub(crate) fn grow_root(&mut self, old_root: NodeId) -> NodeId {
        let root = self.nodes.allocate(Node::internal(vec![old_root]));
        self.nodes[old_root].parent = Some(root);
        self.split_child(root, 0);

        BTreeStats::bump(&self.stats.root_splits);
        debug!(old = %old_root, new = %root, "btree.root_grown");
        root
    }

    /// Split the over-full child at `slot` of `parent`.
    ///
    /// The child keeps entries `[0, m)`, the median `m` moves up into
    /// `parent` at `slot`, and a new right sibling takes `(m, 2m]` along
    /// with the matching children. Both halves end with exactly `m`
    /// entries. Does nothing if the child is not over-full.
    pub(crate) fn split_child(&mut self, parent: NodeId, slot: usize) {
        let m = self.min_degree;
        let full = self.nodes[parent].children[slot];
        if !self.nodes[full].is_overfull(m) {
            return;
        }

        let (median, upper, upper_children, is_leaf) = {
            let node = &mut self.nodes[full];
            let mut upper = node.entries.split_off(m);
            let median = upper.remove(0);
            let upper_children = if node.is_leaf {
                Vec::new()
            } else {
                node.children.split_off(m + 1)
            };
            (median, upper, upper_children, node.is_leaf)
        };

        let sibling = self.nodes.allocate(Node {
            is_leaf,
            entries: upper,
            children: upper_children,
            parent: Some(parent),
        });
        self.adopt_children(sibling);

        let node = &mut self.nodes[parent];
        node.children.insert(slot + 1, sibling);
        node.entries.insert(slot, median);

        BTreeStats::bump(&self.stats.splits);
        trace!(parent = %parent, left = %full, right = %sibling, slot, "btree.split_child");
    }

    /// Point every child of `id` back at `id`.
    pub(crate) fn adopt_children(&mut self, id: NodeId) {
        for i in 0..self.nodes[id].children.len() {
            let child = self.nodes[id].children[i];
            self.nodes[child].parent = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::index::btree::BTree;

    fn shape(tree: &BTree<i32, ()>) -> String {
        tree.dump()
    }

    fn build(order: usize, keys: impl IntoIterator<Item = i32>) -> BTree<i32, ()> {
        let mut tree = BTree::new(order).unwrap();
        for k in keys {
            tree.insert(k, ()).unwrap();
            tree.validate().unwrap();
        }
        tree
    }

    #[test]
    fn test_leaf_root_fills_to_capacity_before_splitting() {
        let tree = build(3, [4, 2, 3, 1]);
        assert_eq!(shape(&tree), "[1, 2, 3, 4]\n");
        assert_eq!(tree.stats().snapshot().splits, 0);
    }

    #[test]
    fn test_leaf_split_promotes_median() {
        let tree = build(3, [15, 3, 8, 23, 1, 9, 14]);
        assert_eq!(shape(&tree), "[8]\n    [1, 3]\n    [9, 14, 15, 23]\n");

        let tree = build(3, [15, 3, 8, 23, 1, 9, 14, 18]);
        assert_eq!(shape(&tree), "[8, 15]\n    [1, 3]\n    [9, 14]\n    [18, 23]\n");
    }

    #[test]
    fn test_internal_split_grows_root() {
        // Ascending keys at order 2 (m = 1): every third key splits a leaf
        let tree = build(2, 1..=7);
        assert_eq!(tree.height(), 3);
        assert_eq!(
            shape(&tree),
            "[4]\n    [2]\n        [1]\n        [3]\n    [6]\n        [5]\n        [7]\n"
        );

        let snapshot = tree.stats().snapshot();
        assert_eq!(snapshot.root_splits, 2);
        assert_eq!(snapshot.splits, 4);
    }

    #[test]
    fn test_split_reparents_moved_children() {
        let tree = build(2, 1..=15);
        tree.validate().unwrap();
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn test_split_child_ignores_legal_child() {
        let mut tree = build(3, [1, 2, 3, 4, 5, 6]);
        let root = tree.root().unwrap();
        let before = shape(&tree);

        tree.split_child(root, 0);
        assert_eq!(shape(&tree), before);
    }
}
