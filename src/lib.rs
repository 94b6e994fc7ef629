//! bindex - an in-memory B-tree index.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            bindex                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │        SharedBTree (index/btree/shared.rs)              │   │
//! │  │          one RwLock around the whole tree               │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              BTree (index/btree/tree.rs)                │   │
//! │  │   root growth / root collapse, search, validate, dump   │   │
//! │  │   ┌─────────────────────┐  ┌────────────────────────┐   │   │
//! │  │   │ insert.rs           │  │ remove.rs              │   │   │
//! │  │   │ split, descent      │  │ fill, borrow, merge,   │   │   │
//! │  │   │                     │  │ upward repair          │   │   │
//! │  │   └─────────────────────┘  └────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │     NodeArena + Node (index/btree/arena.rs, node.rs)    │   │
//! │  │     nodes addressed by NodeId, parent links by id       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`index`] - Index structures (B-tree)
//!
//! # Quick Start
//! ```
//! use bindex::{BTree, Error};
//!
//! let mut tree = BTree::new(3).unwrap();
//! for key in [15, 3, 8, 23, 1, 9, 14, 18, 10, 20, 5, 6, 12, 30] {
//!     tree.insert(key, format!("End_{}", key)).unwrap();
//! }
//!
//! assert!(tree.search(&14).is_some());
//! assert!(tree.search(&40).is_none());
//!
//! tree.remove(&15).unwrap();
//! assert_eq!(tree.remove(&15), Err(Error::KeyNotFound));
//! tree.validate().unwrap();
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_ORDER, MIN_ORDER};
pub use common::{BTreeConfig, Error, NodeId, Result};

pub use index::btree::{BTree, BTreeStats, SharedBTree, StatsSnapshot};
