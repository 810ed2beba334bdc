//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::StorageError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("You do not own this {0}")]
    Forbidden(&'static str),

    #[error("Malformed content: {0}")]
    MalformedContent(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store failure: {0}")]
    Store(String),

    #[error("Upload failed: {0}")]
    Upload(String),
}

impl DomainError {
    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        DomainError::Store(err.to_string())
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        DomainError::Upload(err.to_string())
    }
}
