//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed trees and invalid layout parameters.
/// These are independent of how the tree was loaded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("node id must not be empty (label: {label:?})")]
    EmptyId { label: String },

    #[error("cycle detected in hierarchy: {0}")]
    CycleDetected(String),

    #[error("node {child} references unknown parent: {parent}")]
    UnknownParent { child: String, parent: String },

    #[error("tree has no root node")]
    MissingRoot,

    #[error("tree has more than one root: {0:?}")]
    MultipleRoots(Vec<String>),

    #[error("node {id} at depth {depth} exceeds maximum depth {max}")]
    DepthExceeded { id: String, depth: usize, max: usize },

    #[error("invalid layout spacing: {field} = {value}")]
    InvalidSpacing { field: &'static str, value: f64 },

    #[error("unknown node: {0}")]
    UnknownNode(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
