//! Error types for bindex.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the index.
///
/// Every variant is recoverable: the tree is left unchanged (or, for
/// [`Error::InvariantViolation`], merely inspected) when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested order is too small to form a B-tree.
    ///
    /// The minimum degree is `order - 1`, so anything below 2 would
    /// allow nodes with no keys at all.
    #[error("invalid order {0}: a B-tree needs order >= 2")]
    InvalidOrder(usize),

    /// Remove was called on a tree with no root.
    #[error("operation on an empty tree")]
    EmptyTree,

    /// The key to remove is not in the tree.
    #[error("key not found")]
    KeyNotFound,

    /// The key to insert is already in the tree.
    #[error("duplicate key")]
    DuplicateKey,

    /// A structural check failed. Only produced by `BTree::validate`.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidOrder(1);
        assert_eq!(format!("{}", err), "invalid order 1: a B-tree needs order >= 2");

        let err = Error::EmptyTree;
        assert_eq!(format!("{}", err), "operation on an empty tree");

        let err = Error::InvariantViolation("leaf depth mismatch".into());
        assert_eq!(format!("{}", err), "invariant violated: leaf depth mismatch");
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail(fail: bool) -> Result<u32> {
            if fail {
                Err(Error::KeyNotFound)
            } else {
                Ok(42)
            }
        }

        assert_eq!(might_fail(false).unwrap(), 42);
        assert_eq!(might_fail(true), Err(Error::KeyNotFound));
    }
}
