//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree's construction rules or
/// use of node handles that no longer belong to the tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("stale node handle: {0}")]
    StaleNode(String),

    #[error("invariant violated at {label}: {message}")]
    InvariantViolated { label: String, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
