//! DOM error types

use crate::document::NodeId;

/// Errors raised by tree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node id does not belong to this document
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// Operation requires an element but the node is text
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// Node already has a parent
    #[error("node {0} is already attached")]
    AlreadyAttached(NodeId),

    /// Node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild {
        /// Expected parent
        parent: NodeId,
        /// Offending child
        child: NodeId,
    },

    /// Appending would make a node its own ancestor
    #[error("appending {child} under {parent} would create a cycle")]
    Cycle {
        /// Target parent
        parent: NodeId,
        /// Node being appended
        child: NodeId,
    },
}

/// Result alias for tree operations
pub type DomResult<T> = Result<T, DomError>;
