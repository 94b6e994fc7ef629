//! Configuration for bindex trees.

use crate::common::{Error, Result};

/// Smallest order that still yields a valid B-tree.
///
/// With `order = 2` the minimum degree is 1: non-root nodes hold 1 or 2 keys.
pub const MIN_ORDER: usize = 2;

/// Order used by [`BTreeConfig::default`].
///
/// Order 3 gives a minimum degree of 2: non-root nodes hold 2..=4 keys.
pub const DEFAULT_ORDER: usize = 3;

/// Construction parameters for a [`BTree`](crate::index::btree::BTree).
///
/// # Example
/// ```
/// use bindex::BTreeConfig;
///
/// let config = BTreeConfig::default().with_order(4);
/// assert_eq!(config.min_degree(), 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BTreeConfig {
    /// User-facing order `t`. The minimum degree is `t - 1`.
    pub order: usize,
}

impl BTreeConfig {
    /// Create a config with the given order.
    pub fn new(order: usize) -> Self {
        Self { order }
    }

    /// Replace the order.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Minimum key count for a non-root node (`m`). Max is `2m`.
    #[inline]
    pub fn min_degree(&self) -> usize {
        self.order.saturating_sub(1)
    }

    /// Reject orders below [`MIN_ORDER`].
    pub fn validate(&self) -> Result<()> {
        if self.order < MIN_ORDER {
            return Err(Error::InvalidOrder(self.order));
        }
        Ok(())
    }
}

impl Default for BTreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}
