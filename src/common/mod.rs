//! Common types and utilities shared across bindex.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and [`BTreeConfig`](config::BTreeConfig)
//! - Error types
//! - Identifiers ([`NodeId`])

pub mod config;
pub mod error;
mod node_id;

pub use config::BTreeConfig;
pub use error::{Error, Result};
pub use node_id::NodeId;
