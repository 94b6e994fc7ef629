//! BTree - the public face of the index.
//!
//! The [`BTree`] owns the node arena and the root id. It handles the
//! cases a node cannot handle on itself: growing a new root when the old
//! one overflows, and discarding the root when a removal empties it.
//! The recursive node work lives in `insert.rs` and `remove.rs`.

use tracing::debug;

use crate::common::{BTreeConfig, Error, NodeId, Result};
use crate::index::btree::arena::NodeArena;
use crate::index::btree::node::Node;
use crate::index::btree::stats::BTreeStats;

/// An in-memory B-tree mapping unique keys to values.
///
/// # Occupancy
/// With order `t` the minimum degree is `m = t - 1`. Every non-root node
/// holds between `m` and `2m` entries; the root holds between 1 and `2m`
/// (or the tree has no root at all).
///
/// ```text
/// order 3 (m = 2), after inserting 15, 3, 8, 23, 1:
///
///         [8]
///        /   \
///    [1, 3]  [15, 23]
/// ```
///
/// # Example
/// ```
/// use bindex::BTree;
///
/// let mut tree = BTree::new(3).unwrap();
/// for key in [15, 3, 8, 23, 1] {
///     tree.insert(key, format!("End_{}", key)).unwrap();
/// }
///
/// assert_eq!(tree.search(&8).map(String::as_str), Some("End_8"));
/// assert_eq!(tree.keys(), vec![&1, &3, &8, &15, &23]);
///
/// tree.remove(&8).unwrap();
/// assert!(tree.search(&8).is_none());
/// ```
#[derive(Debug)]
pub struct BTree<K, V> {
    /// Owner of every node. Links between nodes are ids into this table.
    pub(crate) nodes: NodeArena<K, V>,

    /// Current root, or `None` for an empty tree.
    pub(crate) root: Option<NodeId>,

    /// Minimum entry count `m` for non-root nodes.
    pub(crate) min_degree: usize,

    /// Order the tree was built with (`m + 1`).
    order: usize,

    /// Number of key/value pairs stored.
    len: usize,

    pub(crate) stats: BTreeStats,
}

impl<K: Ord, V> BTree<K, V> {
    /// Create an empty tree with minimum degree `order - 1`.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < 2`
    pub fn new(order: usize) -> Result<Self> {
        Self::with_config(BTreeConfig::new(order))
    }

    /// Create an empty tree from a [`BTreeConfig`].
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if the configured order is below 2
    pub fn with_config(config: BTreeConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            nodes: NodeArena::new(),
            root: None,
            min_degree: config.min_degree(),
            order: config.order,
            len: 0,
            stats: BTreeStats::new(),
        })
    }

    // ========================================================================
    // Public API: Mutation
    // ========================================================================

    /// Insert a key/value pair.
    ///
    /// # Errors
    /// - `Error::DuplicateKey` if `key` is already present (tree unchanged)
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        if self.find(&key).is_some() {
            return Err(Error::DuplicateKey);
        }

        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.nodes.allocate(Node::leaf(None));
                debug!(root = %root, "btree.root_created");
                self.root = Some(root);
                root
            }
        };

        // Only place a root split originates from outside the recursion
        let root = if self.nodes[root].is_overfull(self.min_degree) {
            let new_root = self.grow_root(root);
            self.root = Some(new_root);
            new_root
        } else {
            root
        };

        if let Some(new_root) = self.insert_non_full(root, key, value) {
            self.root = Some(new_root);
        }

        self.len += 1;
        Ok(())
    }

    /// Remove `key` and return its value.
    ///
    /// Removing an absent key may still rebalance nodes on the search
    /// path, but never changes the set of stored keys.
    ///
    /// # Errors
    /// - `Error::EmptyTree` if the tree has no root
    /// - `Error::KeyNotFound` if `key` is absent
    pub fn remove(&mut self, key: &K) -> Result<V> {
        let root = self.root.ok_or(Error::EmptyTree)?;

        let removed = self.remove_from(root, key);
        self.shrink_root();

        match removed {
            Some(value) => {
                self.len -= 1;
                Ok(value)
            }
            None => Err(Error::KeyNotFound),
        }
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    // ========================================================================
    // Public API: Lookup
    // ========================================================================

    /// Look up the value stored under `key`.
    pub fn search(&self, key: &K) -> Option<&V> {
        let (id, idx) = self.locate(key)?;
        Some(&self.nodes[id].entries[idx].1)
    }

    /// Look up the value stored under `key` for in-place update.
    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        let (id, idx) = self.locate(key)?;
        Some(&mut self.nodes[id].entries[idx].1)
    }

    /// Find the node and entry index holding `key`.
    pub fn locate(&self, key: &K) -> Option<(NodeId, usize)> {
        BTreeStats::bump(&self.stats.searches);
        let found = self.find(key);
        if found.is_some() {
            BTreeStats::bump(&self.stats.search_hits);
        }
        found
    }

    /// Whether `key` is stored. Does not count as a search.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Search without touching the statistics.
    pub(crate) fn find(&self, key: &K) -> Option<(NodeId, usize)> {
        self.search_from(self.root?, key)
    }

    /// Recursive descent from `id`.
    pub(crate) fn search_from(&self, id: NodeId, key: &K) -> Option<(NodeId, usize)> {
        let node = &self.nodes[id];
        let idx = node.find_key_index(key);

        if matches!(node.entries.get(idx), Some((k, _)) if k == key) {
            return Some((id, idx));
        }
        if node.is_leaf {
            return None;
        }
        self.search_from(node.children[idx], key)
    }

    // ========================================================================
    // Public API: Shape and diagnostics
    // ========================================================================

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no root.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Order the tree was built with.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Minimum entries per non-root node (`m`).
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Current root id, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of levels; 0 for an empty tree, 1 for a lone leaf root.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(id) = current {
            height += 1;
            current = self.nodes[id].children.first().copied();
        }
        height
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.live_count()
    }

    /// Entry count of a live node, `None` for a stale id.
    pub fn node_entry_count(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id).map(Node::entry_count)
    }

    /// Live operation counters.
    pub fn stats(&self) -> &BTreeStats {
        &self.stats
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        if let Some(root) = self.root {
            self.collect_keys(root, &mut keys);
        }
        keys
    }

    fn collect_keys<'a>(&'a self, id: NodeId, out: &mut Vec<&'a K>) {
        let node = &self.nodes[id];
        for (i, (key, _)) in node.entries.iter().enumerate() {
            if !node.is_leaf {
                self.collect_keys(node.children[i], out);
            }
            out.push(key);
        }
        if let (false, Some(&last)) = (node.is_leaf, node.children.last()) {
            self.collect_keys(last, out);
        }
    }

    /// Key-only rendering, one node per line, four spaces per level.
    ///
    /// ```text
    /// [8]
    ///     [1, 3]
    ///     [15, 23]
    /// ```
    pub fn dump(&self) -> String
    where
        K: std::fmt::Debug,
    {
        let mut out = String::new();
        match self.root {
            Some(root) => self.dump_node(root, 0, &mut out),
            None => out.push_str("(empty)\n"),
        }
        out
    }

    fn dump_node(&self, id: NodeId, level: usize, out: &mut String)
    where
        K: std::fmt::Debug,
    {
        let node = &self.nodes[id];
        let keys: Vec<&K> = node.entries.iter().map(|(k, _)| k).collect();
        out.push_str(&"    ".repeat(level));
        out.push_str(&format!("{:?}\n", keys));
        for &child in &node.children {
            self.dump_node(child, level + 1, out);
        }
    }

    /// Check every structural invariant.
    ///
    /// # Errors
    /// - `Error::InvariantViolation` describing the first breach found
    pub fn validate(&self) -> Result<()> {
        let Some(root) = self.root else {
            if self.len != 0 || self.nodes.live_count() != 0 {
                return Err(violation(format!(
                    "empty tree still holds {} entries in {} nodes",
                    self.len,
                    self.nodes.live_count()
                )));
            }
            return Ok(());
        };

        if self.nodes[root].parent.is_some() {
            return Err(violation(format!("root {} has a parent", root)));
        }
        if self.nodes[root].entry_count() == 0 {
            return Err(violation(format!("root {} is empty", root)));
        }

        let mut check = Check {
            leaf_depth: None,
            entries: 0,
            nodes: 0,
        };
        self.validate_node(root, 0, None, None, &mut check)?;

        if check.entries != self.len {
            return Err(violation(format!(
                "counted {} entries, tree reports {}",
                check.entries, self.len
            )));
        }
        if check.nodes != self.nodes.live_count() {
            return Err(violation(format!(
                "{} nodes reachable, {} live in arena",
                check.nodes,
                self.nodes.live_count()
            )));
        }
        Ok(())
    }

    fn validate_node(
        &self,
        id: NodeId,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        check: &mut Check,
    ) -> Result<()> {
        let m = self.min_degree;
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| violation(format!("{} is referenced but not live", id)))?;
        let count = node.entry_count();
        check.nodes += 1;
        check.entries += count;

        if count > 2 * m {
            return Err(violation(format!("{} holds {} entries, max {}", id, count, 2 * m)));
        }
        if Some(id) != self.root && count < m {
            return Err(violation(format!("{} holds {} entries, min {}", id, count, m)));
        }

        let ordered = node.entries.windows(2).all(|w| w[0].0 < w[1].0);
        let above = lower.map_or(true, |lo| node.entries.iter().all(|(k, _)| k > lo));
        let below = upper.map_or(true, |hi| node.entries.iter().all(|(k, _)| k < hi));
        if !(ordered && above && below) {
            return Err(violation(format!("{} keys out of order or out of bounds", id)));
        }

        if node.is_leaf {
            if !node.children.is_empty() {
                return Err(violation(format!("leaf {} has children", id)));
            }
            match check.leaf_depth {
                None => check.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(violation(format!(
                        "leaf {} at depth {}, expected {}",
                        id, depth, expected
                    )));
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.children.len() != count + 1 {
            return Err(violation(format!(
                "{} has {} entries but {} children",
                id,
                count,
                node.children.len()
            )));
        }

        for (i, &child) in node.children.iter().enumerate() {
            let parent = self.nodes.get(child).and_then(|c| c.parent);
            if parent != Some(id) {
                return Err(violation(format!("{} does not point back to parent {}", child, id)));
            }
            let lo = if i == 0 { lower } else { Some(&node.entries[i - 1].0) };
            let hi = node.entries.get(i).map(|(k, _)| k).or(upper);
            self.validate_node(child, depth + 1, lo, hi, check)?;
        }
        Ok(())
    }

    // ========================================================================
    // Internal: Root maintenance
    // ========================================================================

    /// Discard an emptied root after a removal.
    ///
    /// An internal root hands over to its sole child; a leaf root leaves
    /// the tree empty.
    fn shrink_root(&mut self) {
        let Some(root) = self.root else { return };
        if self.nodes[root].entry_count() > 0 {
            return;
        }

        let Some(old) = self.nodes.release(root) else { return };
        BTreeStats::bump(&self.stats.root_collapses);

        match old.children.first() {
            Some(&child) if !old.is_leaf => {
                self.nodes[child].parent = None;
                self.root = Some(child);
                debug!(old = %root, new = %child, "btree.root_collapsed");
            }
            _ => {
                self.root = None;
                debug!(old = %root, "btree.emptied");
            }
        }
    }

    /// Find "my slot in my parent's children".
    pub(crate) fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes[id].parent?;
        let slot = self.nodes[parent].child_index(id)?;
        Some((parent, slot))
    }
}

/// Running totals for `validate`.
struct Check {
    leaf_depth: Option<usize>,
    entries: usize,
    nodes: usize,
}

fn violation(msg: String) -> Error {
    Error::InvariantViolation(msg)
}
