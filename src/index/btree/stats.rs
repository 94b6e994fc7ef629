//! Tree statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Structural and lookup counters for one tree.
///
/// Counters are atomic so lookups, which only hold `&BTree`, can record
/// hits and misses. `Ordering::Relaxed` is enough: no counter is used to
/// synchronise with another.
///
/// # Example
/// ```
/// use bindex::BTreeStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = BTreeStats::new();
/// stats.splits.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().splits, 1);
/// ```
#[derive(Debug)]
pub struct BTreeStats {
    /// Number of searches performed.
    pub searches: AtomicU64,

    /// Number of searches that found their key.
    pub search_hits: AtomicU64,

    /// Number of node splits, root splits included.
    pub splits: AtomicU64,

    /// Number of times the tree grew a new root.
    pub root_splits: AtomicU64,

    /// Number of sibling merges.
    pub merges: AtomicU64,

    /// Number of entries rotated between siblings.
    pub borrows: AtomicU64,

    /// Number of times an empty root was discarded.
    pub root_collapses: AtomicU64,
}

impl BTreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            searches: AtomicU64::new(0),
            search_hits: AtomicU64::new(0),
            splits: AtomicU64::new(0),
            root_splits: AtomicU64::new(0),
            merges: AtomicU64::new(0),
            borrows: AtomicU64::new(0),
            root_collapses: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            search_hits: self.search_hits.load(Ordering::Relaxed),
            splits: self.splits.load(Ordering::Relaxed),
            root_splits: self.root_splits.load(Ordering::Relaxed),
            merges: self.merges.load(Ordering::Relaxed),
            borrows: self.borrows.load(Ordering::Relaxed),
            root_collapses: self.root_collapses.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.searches.store(0, Ordering::Relaxed);
        self.search_hits.store(0, Ordering::Relaxed);
        self.splits.store(0, Ordering::Relaxed);
        self.root_splits.store(0, Ordering::Relaxed);
        self.merges.store(0, Ordering::Relaxed);
        self.borrows.store(0, Ordering::Relaxed);
        self.root_collapses.store(0, Ordering::Relaxed);
    }
}

impl Default for BTreeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`BTreeStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub searches: u64,
    pub search_hits: u64,
    pub splits: u64,
    pub root_splits: u64,
    pub merges: u64,
    pub borrows: u64,
    pub root_collapses: u64,
}

impl StatsSnapshot {
    /// Fraction of searches that found their key (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        if self.searches == 0 {
            0.0
        } else {
            self.search_hits as f64 / self.searches as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ searches: {}, hit_rate: {:.2}%, splits: {}, merges: {}, borrows: {} }}",
            self.searches,
            self.hit_rate() * 100.0,
            self.splits,
            self.merges,
            self.borrows
        )
    }
}
