//! Domain-level errors (no I/O concerns)

use thiserror::Error;

/// Domain errors represent malformed input or configuration.
///
/// Ids are carried in their display form so the error stays independent of
/// the record type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate instance id: {0}")]
    DuplicateId(String),

    #[error("cycle detected in instance hierarchy at id: {0}")]
    CycleDetected(String),

    #[error("invalid layout configuration: {0}")]
    InvalidLayout(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
