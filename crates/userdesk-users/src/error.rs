//! User storage error types.

use thiserror::Error;
use userdesk_core::{DatabaseError, RusqliteErrorExt};

/// Errors that can occur during user store operations.
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// Rejected input (empty name, malformed email, bad country code).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated (duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Underlying database failure.
    #[error(transparent)]
    Storage(DatabaseError),

    /// The blocking task running the query failed.
    #[error("Store task failed: {0}")]
    Task(String),
}

impl UserStoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the caller supplied bad input, as opposed to a server fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Conflict(_))
    }
}

impl From<rusqlite::Error> for UserStoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err.into_database_error() {
            DatabaseError::ConstraintViolation(msg) => Self::Conflict(msg),
            other => Self::Storage(other),
        }
    }
}

impl From<tokio::task::JoinError> for UserStoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Result type for user store operations.
pub type UserStoreResult<T> = Result<T, UserStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(UserStoreError::validation("bad").is_client_error());
        assert!(UserStoreError::Conflict("dup".into()).is_client_error());
        assert!(!UserStoreError::Storage(DatabaseError::QueryFailed("x".into())).is_client_error());
        assert!(!UserStoreError::Task("panicked".into()).is_client_error());
    }
}
