//! NodeArena - the slot table that owns every node of a tree.
//!
//! Nodes refer to each other by [`NodeId`]. The arena is the only owner,
//! so parent links can never keep a node alive or free it twice.

use std::ops::{Index, IndexMut};

use crate::common::NodeId;
use crate::index::btree::node::Node;

/// Owns all nodes of one tree.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │                  NodeArena                    │
/// │  slots: Vec<Option<Node>>                     │
/// │   [Node0] [None] [Node2] [Node3] ...          │
/// │  free_list: Vec<NodeId>   (LIFO reuse)        │
/// │   [1]                                         │
/// └──────────────────────────────────────────────┘
/// ```
#[derive(Debug)]
pub(crate) struct NodeArena<K, V> {
    /// Node storage; `None` marks a released slot.
    slots: Vec<Option<Node<K, V>>>,

    /// Stack of released slot ids (LIFO for cache locality).
    free_list: Vec<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `node`, reusing a released slot if there is one.
    pub(crate) fn allocate(&mut self, node: Node<K, V>) -> NodeId {
        match self.free_list.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId::new(self.slots.len() - 1)
            }
        }
    }

    /// Remove a node from the arena and hand it back to the caller.
    ///
    /// Returns `None` if the slot was already released.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<Node<K, V>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id);
        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id.0)?.as_ref()
    }

    /// Number of live nodes.
    pub(crate) fn live_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Drop every node and forget all ids.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Node<K, V> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("{} is not a live node", id),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("{} is not a live node", id),
        }
    }
}
