//! SharedBTree - a tree behind one reader/writer lock.
//!
//! [`BTree`] itself is single-threaded. This wrapper is the coarse-grained
//! option: every mutation takes the write lock for the whole tree, lookups
//! share the read lock.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::common::{BTreeConfig, Result};
use crate::index::btree::stats::StatsSnapshot;
use crate::index::btree::tree::BTree;

/// Cloneable, thread-safe handle to a [`BTree`].
///
/// # Thread Safety
/// - `insert` / `remove`: exclusive (`RwLock::write`)
/// - `get` / `contains_key` / `len`: shared (`RwLock::read`)
///
/// # Example
/// ```
/// use bindex::SharedBTree;
/// use std::thread;
///
/// let tree = SharedBTree::new(3).unwrap();
/// let writer = tree.clone();
/// thread::spawn(move || writer.insert(1, "one").unwrap())
///     .join()
///     .unwrap();
///
/// assert_eq!(tree.get(&1), Some("one"));
/// ```
pub struct SharedBTree<K, V> {
    inner: Arc<RwLock<BTree<K, V>>>,
}

impl<K: Ord, V> SharedBTree<K, V> {
    /// Create an empty shared tree.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < 2`
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::from_tree(BTree::new(order)?))
    }

    /// Create an empty shared tree from a config.
    pub fn with_config(config: BTreeConfig) -> Result<Self> {
        Ok(Self::from_tree(BTree::with_config(config)?))
    }

    /// Take ownership of an existing tree.
    pub fn from_tree(tree: BTree<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// See [`BTree::insert`].
    pub fn insert(&self, key: K, value: V) -> Result<()> {
        self.inner.write().insert(key, value)
    }

    /// See [`BTree::remove`].
    pub fn remove(&self, key: &K) -> Result<V> {
        self.inner.write().remove(key)
    }

    /// Cloned value stored under `key`.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().search(key).cloned()
    }

    /// Whether `key` is stored, under a read lock.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Point-in-time copy of the counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.read().stats().snapshot()
    }

    /// Hold the read lock for several lookups, `validate` or `dump`.
    pub fn read(&self) -> RwLockReadGuard<'_, BTree<K, V>> {
        self.inner.read()
    }
}

impl<K, V> Clone for SharedBTree<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
