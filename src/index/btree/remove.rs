//! Removal: borrowing, merging and upward deficiency repair.
//!
//! # Strategy
//! ```text
//! key in leaf      → delete; if the leaf drops below m, fill it through
//!                    its parent and walk up repairing ancestors
//! key in internal  → swap with predecessor/successor if a neighbour
//!                    child can spare one, else merge the two children
//! key not here     → if the target child sits at m and cannot contain
//!                    the key, fill it first; then descend
//! ```
//!
//! `fill` borrows from the left sibling, then the right sibling, and
//! only then merges, preferring the left sibling unless the child is
//! leftmost.

use std::mem;

use tracing::trace;

use crate::common::NodeId;
use crate::index::btree::node::Node;
use crate::index::btree::stats::BTreeStats;
use crate::index::btree::tree::BTree;

impl<K: Ord, V> BTree<K, V> {
    /// Remove `key` from the subtree rooted at `id`.
    ///
    /// After a removal that reached a leaf, nodes above `id` may have been
    /// merged away, so callers must not reuse ids they held across the call.
    pub(crate) fn remove_from(&mut self, id: NodeId, key: &K) -> Option<V> {
        let m = self.min_degree;
        let idx = self.nodes[id].find_key_index(key);
        let found = matches!(self.nodes[id].entries.get(idx), Some((k, _)) if k == key);

        if found {
            if !self.nodes[id].is_leaf {
                return self.remove_from_internal(id, idx, key);
            }

            let (_, value) = self.nodes[id].entries.remove(idx);
            if self.nodes[id].is_deficient(m) {
                if let Some((parent, slot)) = self.index_in_parent(id) {
                    self.fill(parent, slot);
                    self.fix_deficiency_upward(parent);
                }
            }
            return Some(value);
        }

        if self.nodes[id].is_leaf {
            return None;
        }

        let mut slot = idx;
        let child = self.nodes[id].children[slot];
        let prefill = self.nodes[child].entry_count() == m && self.search_from(child, key).is_none();
        if prefill {
            slot = self.fill(id, slot);
        }

        let child = self.nodes[id].children[slot];
        let removed = self.remove_from(child, key);

        // Nothing was removed below, so `id` and `slot` are still valid.
        // A merge in `fill` may have left the child at 2m + 1.
        if prefill {
            self.split_child(id, slot);
        }
        removed
    }

    /// Remove `entries[idx]` (whose key is `key`) from internal node `id`.
    fn remove_from_internal(&mut self, id: NodeId, idx: usize, key: &K) -> Option<V> {
        let m = self.min_degree;
        let left = self.nodes[id].children[idx];
        let right = self.nodes[id].children[idx + 1];

        if self.nodes[left].can_lend(m) {
            // Predecessor takes the key's place; the key drops to where
            // the predecessor was and is removed from there.
            if self.swap_with_predecessor(id, idx) {
                return self.remove_from(left, key);
            }
        } else if self.nodes[right].can_lend(m) {
            if self.swap_with_successor(id, idx) {
                return self.remove_from(right, key);
            }
        }

        self.merge(id, idx);
        let merged = self.nodes[id].children[idx];
        let removed = self.remove_from(merged, key);

        if self.nodes[merged].is_overfull(m) {
            self.split_child(id, idx);
        } else if self.nodes[id].is_deficient(m) {
            if let Some((parent, slot)) = self.index_in_parent(id) {
                self.fill(parent, slot);
                self.fix_deficiency_upward(parent);
            }
        }
        removed
    }

    /// Exchange `entries[idx]` of `id` with the rightmost entry of its
    /// left subtree. Order is preserved: the moved key is larger than
    /// everything else in that subtree.
    fn swap_with_predecessor(&mut self, id: NodeId, idx: usize) -> bool {
        let leaf = self.rightmost_leaf(self.nodes[id].children[idx]);
        let Some(pred) = self.nodes[leaf].entries.pop() else {
            return false;
        };
        let target = mem::replace(&mut self.nodes[id].entries[idx], pred);
        self.nodes[leaf].entries.push(target);
        true
    }

    /// Mirror of [`swap_with_predecessor`](Self::swap_with_predecessor)
    /// using the leftmost entry of the right subtree.
    fn swap_with_successor(&mut self, id: NodeId, idx: usize) -> bool {
        let leaf = self.leftmost_leaf(self.nodes[id].children[idx + 1]);
        if self.nodes[leaf].entries.is_empty() {
            return false;
        }
        let succ = self.nodes[leaf].entries.remove(0);
        let target = mem::replace(&mut self.nodes[id].entries[idx], succ);
        self.nodes[leaf].entries.insert(0, target);
        true
    }

    fn rightmost_leaf(&self, mut id: NodeId) -> NodeId {
        while let Some(&last) = self.nodes[id].children.last() {
            id = last;
        }
        id
    }

    fn leftmost_leaf(&self, mut id: NodeId) -> NodeId {
        while let Some(&first) = self.nodes[id].children.first() {
            id = first;
        }
        id
    }

    /// Bring `children[idx]` of `parent` above its minimum.
    ///
    /// Returns the slot the child occupies afterwards: a merge into the
    /// left sibling moves it to `idx - 1`.
    pub(crate) fn fill(&mut self, parent: NodeId, idx: usize) -> usize {
        let m = self.min_degree;
        let count = self.nodes[parent].entry_count();
        if count == 0 {
            // No sibling to borrow from or merge with
            return idx;
        }
        let children = &self.nodes[parent].children;

        if idx != 0 && self.nodes[children[idx - 1]].can_lend(m) {
            self.borrow_from_prev(parent, idx);
            idx
        } else if idx != count && self.nodes[children[idx + 1]].can_lend(m) {
            self.borrow_from_next(parent, idx);
            idx
        } else if idx != 0 {
            self.merge(parent, idx - 1);
            idx - 1
        } else {
            self.merge(parent, idx);
            idx
        }
    }

    /// Rotate the left sibling's last entry through the separator into
    /// `children[idx]`.
    fn borrow_from_prev(&mut self, parent: NodeId, idx: usize) {
        let child = self.nodes[parent].children[idx];
        let sibling = self.nodes[parent].children[idx - 1];

        let Some(lent) = self.nodes[sibling].entries.pop() else {
            return;
        };
        let separator = mem::replace(&mut self.nodes[parent].entries[idx - 1], lent);
        self.nodes[child].entries.insert(0, separator);

        if !self.nodes[child].is_leaf {
            if let Some(moved) = self.nodes[sibling].children.pop() {
                self.nodes[child].children.insert(0, moved);
                self.nodes[moved].parent = Some(child);
            }
        }

        BTreeStats::bump(&self.stats.borrows);
        trace!(parent = %parent, from = %sibling, to = %child, "btree.borrow_from_prev");
    }

    /// Rotate the right sibling's first entry through the separator into
    /// `children[idx]`.
    fn borrow_from_next(&mut self, parent: NodeId, idx: usize) {
        let child = self.nodes[parent].children[idx];
        let sibling = self.nodes[parent].children[idx + 1];

        if self.nodes[sibling].entries.is_empty() {
            return;
        }
        let lent = self.nodes[sibling].entries.remove(0);
        let separator = mem::replace(&mut self.nodes[parent].entries[idx], lent);
        self.nodes[child].entries.push(separator);

        if !self.nodes[child].is_leaf && !self.nodes[sibling].children.is_empty() {
            let moved = self.nodes[sibling].children.remove(0);
            self.nodes[child].children.push(moved);
            self.nodes[moved].parent = Some(child);
        }

        BTreeStats::bump(&self.stats.borrows);
        trace!(parent = %parent, from = %sibling, to = %child, "btree.borrow_from_next");
    }

    /// Fold `children[idx + 1]` and the separator into `children[idx]`.
    ///
    /// The right sibling is released from the arena.
    pub(crate) fn merge(&mut self, parent: NodeId, idx: usize) {
        let left = self.nodes[parent].children[idx];
        let right = self.nodes[parent].children[idx + 1];

        let Some(Node {
            entries, children, ..
        }) = self.nodes.release(right)
        else {
            return;
        };

        let separator = self.nodes[parent].entries.remove(idx);
        self.nodes[parent].children.remove(idx + 1);

        let node = &mut self.nodes[left];
        node.entries.push(separator);
        node.entries.extend(entries);
        node.children.extend_from_slice(&children);
        for child in children {
            self.nodes[child].parent = Some(left);
        }

        BTreeStats::bump(&self.stats.merges);
        trace!(parent = %parent, into = %left, released = %right, "btree.merge");
    }

    /// Walk up from `start`, filling every non-root ancestor left below
    /// the minimum. Stops at the root or the first node that is fine.
    pub(crate) fn fix_deficiency_upward(&mut self, start: NodeId) {
        let m = self.min_degree;
        let mut current = start;

        while let Some((parent, slot)) = self.index_in_parent(current) {
            if !self.nodes[current].is_deficient(m) {
                break;
            }
            self.fill(parent, slot);
            current = parent;
        }
    }
}
