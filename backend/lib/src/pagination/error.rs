//! Error types for the pagination engine.

use thiserror::Error;

use super::value::ValueKind;

/// Boxed error produced by a record source, surfaced without interpretation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of a paginated query.
///
/// Messages never include token content: [`PaginationError::MalformedToken`]
/// only carries a static reason.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// The requested page size is not in `1..=max`
    #[error("Invalid limit {limit}: must be between 1 and {max}")]
    InvalidLimit { limit: i64, max: i64 },

    /// The continuation token could not be parsed, has an unknown version,
    /// was issued for another sort order or carries the wrong number of values
    #[error("Malformed continuation token: {0}")]
    MalformedToken(&'static str),

    /// A decoded token value is not of the type its sort field compares with
    #[error("Continuation token value for `{field}` is not a valid {expected}")]
    TypeMismatch { field: String, expected: ValueKind },

    /// The sort specification cannot produce a total order
    #[error("Invalid sort specification: {0}")]
    InvalidSortSpec(String),

    /// The underlying record source failed (including timeouts)
    #[error("Record source failure: {0}")]
    RecordSource(#[source] BoxError),
}

impl PaginationError {
    /// Whether the failure was caused by the caller's input.
    ///
    /// Client errors are detected before any query is issued.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidLimit { .. } | Self::MalformedToken(_) | Self::TypeMismatch { .. }
        )
    }

    pub(crate) fn record_source(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::RecordSource(Box::new(err))
    }
}
