//! Error types for visitor operations.

use std::fmt;

/// Errors that can occur while editing a visitor tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitorError {
    /// A child was added to a node whose children are text.
    InvalidOperation {
        /// Type of the receiving node.
        node_type: String,
    },

    /// The reference child is not a current child of the receiver.
    ReferenceNotFound {
        /// Type of the receiving node.
        node_type: String,
    },

    /// Inserting the node would make it its own ancestor.
    WouldCycle {
        /// Type of the node being inserted.
        node_type: String,
    },

    /// The host froze the element and no freeze suspension is active.
    Frozen {
        /// Type of the frozen element.
        node_type: String,
    },
}

impl fmt::Display for VisitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitorError::InvalidOperation { node_type } => {
                write!(f, "Cannot add children to text node '{}'", node_type)
            }
            VisitorError::ReferenceNotFound { node_type } => {
                write!(f, "Reference child is not a child of '{}'", node_type)
            }
            VisitorError::WouldCycle { node_type } => {
                write!(f, "Node '{}' cannot become its own descendant", node_type)
            }
            VisitorError::Frozen { node_type } => {
                write!(f, "Element '{}' is frozen", node_type)
            }
        }
    }
}

impl std::error::Error for VisitorError {}

/// Result type for visitor operations.
pub type VisitorResult<T> = Result<T, VisitorError>;
