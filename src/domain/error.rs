//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent contract violations against the tree store
/// and invalid hierarchy descriptions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid node reference: {0} does not resolve to a live node in this store")]
    InvalidNodeReference(NodeId),

    #[error("node has no children to derive a state from: {0}")]
    LeafHasNoChildren(String),

    #[error("hierarchy has no root nodes")]
    EmptyHierarchy,

    #[error("invalid label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("duplicate label {label:?} under {parent}")]
    DuplicateLabel { parent: String, label: String },

    #[error("no node at path: {0}")]
    PathNotFound(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
