//! B-tree index implementation.
//!
//! # Components
//! - [`BTree`] - The tree: public API and root maintenance
//! - [`SharedBTree`] - `RwLock`-guarded handle for use across threads
//! - [`BTreeStats`] - Split/merge/borrow and lookup counters
//!
//! Node storage, splitting and removal are internal:
//! - `node` - per-node entries, children and parent link
//! - `arena` - slot table owning every node, addressed by `NodeId`
//! - `insert` - split and recursive insert
//! - `remove` - fill, borrow, merge and upward repair

mod arena;
mod insert;
mod node;
mod remove;
mod shared;
mod stats;
mod tree;

pub use shared::SharedBTree;
pub use stats::{BTreeStats, StatsSnapshot};
pub use tree::BTree;
