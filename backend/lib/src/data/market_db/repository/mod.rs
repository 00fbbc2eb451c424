//! Repository pattern implementation for database operations.
//!
//! ## Key Components
//! - [`ConnectionPool`](pool::ConnectionPool) - bb8 pool sized by [`PoolSettings`](pool::PoolSettings)
//! - [`RepositoryError`](error::RepositoryError) - Error types for repository operations
//! - [`StorageOperations`] - Everything the services need from a store
//! - [`Repository`](postgres::Repository) - PostgreSQL implementation
//!
//! Listing goes through [`RecordSource`], so every store also serves as the
//! record source of the page assembler.
//!
//! ## Usage Example
//! ```ignore
//! use repository::{postgres::Repository, MarketOps};
//!
//! let repo = Repository::new(&database_url, config.database.pool.settings()).await?;
//! let article = repo.get_article(1).await?;
//! ```

use async_trait::async_trait;
use market_db::{
    models::{ArticleChangeset, NewArticle, NewProduct, ProductChangeset},
    Article, Comment, CommentTarget, Product,
};

use crate::pagination::RecordSource;

pub mod error;
pub mod pool;
pub mod postgres;
mod query;

use error::{RepositoryError, RepositoryResult};

/// Single-entity operations on articles, products and comments.
///
/// ## Implementation Notes
/// - Methods follow consistent naming: `create_*`, `get_*`, `update_*`, `delete_*`
/// - A missing entity is reported as [`RepositoryError::NotFound`]
/// - Comment operations are scoped to their parent: a comment under another
///   parent is treated as missing
/// - Deleting an article or product deletes its comments
#[async_trait]
pub trait MarketOps: Send + Sync {
    /// Check that the store answers a trivial query
    async fn ping(&self) -> RepositoryResult<()>;

    // ============ Articles ============
    async fn create_article(&self, new: NewArticle) -> RepositoryResult<Article>;

    async fn get_article(&self, id: i64) -> RepositoryResult<Article>;

    async fn update_article(&self, id: i64, changes: ArticleChangeset)
        -> RepositoryResult<Article>;

    async fn delete_article(&self, id: i64) -> RepositoryResult<Article>;

    // ============ Products ============
    async fn create_product(&self, new: NewProduct) -> RepositoryResult<Product>;

    async fn get_product(&self, id: i64) -> RepositoryResult<Product>;

    async fn update_product(&self, id: i64, changes: ProductChangeset)
        -> RepositoryResult<Product>;

    async fn delete_product(&self, id: i64) -> RepositoryResult<Product>;

    // ============ Comments ============
    async fn create_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        content: String,
    ) -> RepositoryResult<Comment>;

    async fn update_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        id: i64,
        content: String,
    ) -> RepositoryResult<Comment>;

    async fn delete_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        id: i64,
    ) -> RepositoryResult<Comment>;
}

/// The full set of operations a store provides to the services.
pub trait StorageOperations:
    MarketOps
    + RecordSource<Article, Error = RepositoryError>
    + RecordSource<Product, Error = RepositoryError>
    + RecordSource<Comment, Error = RepositoryError>
{
}

impl<T> StorageOperations for T where
    T: MarketOps
        + RecordSource<Article, Error = RepositoryError>
        + RecordSource<Product, Error = RepositoryError>
        + RecordSource<Comment, Error = RepositoryError>
{
}
