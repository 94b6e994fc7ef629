//! Index structures.
//!
//! - [`btree`] - In-memory B-tree with parent-linked nodes

pub mod btree;
