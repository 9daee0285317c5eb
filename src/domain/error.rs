//! Domain-level errors (no I/O concerns)

use thiserror::Error;

/// Domain errors: the tree document is not a well-formed weighted tree.
///
/// All of these are fatal at load time.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("malformed tree document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("tree document has no root record")]
    EmptyTree,

    #[error("node without name below: {parent}")]
    MissingName { parent: String },

    #[error("invalid node name {name:?} below {parent}: {reason}")]
    InvalidName {
        parent: String,
        name: String,
        reason: String,
    },

    #[error("invalid weight {value} for leaf: {path}")]
    InvalidWeight { path: String, value: f64 },

    #[error("duplicate sibling name: {path}")]
    DuplicateSibling { path: String },

    #[error("cycle detected in hierarchy: {0}")]
    CycleDetected(String),

    #[error("branch not found below root: {0}")]
    UnknownBranch(String),

    #[error("invalid selection path: {0:?}")]
    InvalidPath(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
