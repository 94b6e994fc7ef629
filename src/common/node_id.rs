//! Node identifier type.

use std::fmt;

/// Identifies a node slot in a tree's node arena.
///
/// Using `usize` so the id indexes the arena directly: `slots[node_id.0]`.
/// Ids are only meaningful for the tree that issued them, and a released
/// id may be handed out again by a later split.
///
/// # Example
/// ```
/// use bindex::NodeId;
///
/// let node_id = NodeId::new(5);
/// assert_eq!(node_id.0, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Create a new NodeId.
    #[inline]
    pub fn new(id: usize) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_equality() {
        assert_eq!(NodeId::new(5), NodeId::new(5));
        assert_ne!(NodeId::new(5), NodeId::new(6));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(format!("{}", NodeId::new(42)), "Node(42)");
    }
}
