//! Market database access module using repository pattern
//!
//! This module provides database access through a repository abstraction,
//! with both production PostgreSQL and mock implementations. Both double as
//! record sources for paginated listings.

pub mod client;
#[cfg(feature = "mocks")]
pub mod mock_repository;
pub mod repository;
#[cfg(test)]
pub mod test_helpers;
