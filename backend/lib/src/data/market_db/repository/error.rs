//! Error types for repository operations.
//!
//! ## Error Categories
//! - Database errors from diesel operations
//! - Connection pool errors
//! - Not found errors for missing entities
//! - Filters or orderings the store cannot express

use thiserror::Error;

/// Main error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database operation error from diesel
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Connection pool error
    #[error("Pool error: {0}")]
    Pool(String),

    /// Entity not found error
    #[error("Not found: {entity}")]
    NotFound {
        /// The type of entity that was not found (e.g. "Article")
        entity: String,
    },

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backing store is not reachable
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Create a new NotFound error for the given entity type.
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    /// Create a new InvalidInput error with the given message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Check if this error represents a not found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is due to a database constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::CheckViolation,
                _,
            )) | Self::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ))
        )
    }
}

/// Type alias for Results that may fail with RepositoryError
pub type RepositoryResult<T> = Result<T, RepositoryError>;
