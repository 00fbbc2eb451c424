//! Database client wrapper using repository pattern abstraction
//!
//! This module provides a database client that delegates all operations
//! to an underlying repository implementation, allowing for both production
//! PostgreSQL and mock implementations for testing. Paginated listings go
//! through a [`PageAssembler`] backed by the same repository.

use std::sync::Arc;

use market_db::{
    models::{ArticleChangeset, NewArticle, NewProduct, ProductChangeset},
    Article, Comment, CommentTarget, Product,
};

use crate::{
    data::market_db::repository::StorageOperations,
    error::Result,
    pagination::{Filter, Page, PageAssembler, PageLimits, RecordSource, SortSpec},
};

/// Database client that delegates to a repository implementation
///
/// ## Usage Example
/// ```ignore
/// // Production usage with PostgreSQL
/// let repo = Repository::new(&database_url, pool_settings).await?;
/// let client = DBClient::new(Arc::new(repo), PageLimits::default());
///
/// // Test usage with mock
/// let client = DBClient::new(Arc::new(MockRepository::new()), PageLimits::default());
/// ```
#[derive(Clone)]
pub struct DBClient {
    repository: Arc<dyn StorageOperations>,
    pages: PageAssembler<Arc<dyn StorageOperations>>,
}

impl DBClient {
    /// Create a new database client with the given repository
    ///
    /// # Arguments
    /// * `repository` - Repository implementation to use for database operations
    /// * `limits` - Bounds applied to every paginated listing
    pub fn new(repository: Arc<dyn StorageOperations>, limits: PageLimits) -> Self {
        Self {
            pages: PageAssembler::new(repository.clone(), limits),
            repository,
        }
    }

    /// Bounds applied to paginated listings
    pub fn page_limits(&self) -> PageLimits {
        self.pages.limits()
    }

    /// Test the database connection
    pub async fn test_connection(&self) -> Result<()> {
        Ok(self.repository.ping().await?)
    }

    /// Fetch one page of records of type `R`
    pub async fn fetch_page<R>(
        &self,
        sort: &SortSpec,
        filter: Filter,
        token: Option<&str>,
        limit: i64,
    ) -> Result<Page<R>>
    where
        R: crate::pagination::FieldAccess + Send + 'static,
        dyn StorageOperations: RecordSource<R>,
    {
        Ok(self.pages.fetch_page(sort, filter, token, limit).await?)
    }

    // ============ Articles ============

    pub async fn create_article(&self, new: NewArticle) -> Result<Article> {
        Ok(self.repository.create_article(new).await?)
    }

    pub async fn get_article(&self, id: i64) -> Result<Article> {
        Ok(self.repository.get_article(id).await?)
    }

    pub async fn update_article(&self, id: i64, changes: ArticleChangeset) -> Result<Article> {
        Ok(self.repository.update_article(id, changes).await?)
    }

    pub async fn delete_article(&self, id: i64) -> Result<Article> {
        Ok(self.repository.delete_article(id).await?)
    }

    // ============ Products ============

    pub async fn create_product(&self, new: NewProduct) -> Result<Product> {
        Ok(self.repository.create_product(new).await?)
    }

    pub async fn get_product(&self, id: i64) -> Result<Product> {
        Ok(self.repository.get_product(id).await?)
    }

    pub async fn update_product(&self, id: i64, changes: ProductChangeset) -> Result<Product> {
        Ok(self.repository.update_product(id, changes).await?)
    }

    pub async fn delete_product(&self, id: i64) -> Result<Product> {
        Ok(self.repository.delete_product(id).await?)
    }

    // ============ Comments ============

    pub async fn create_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        content: String,
    ) -> Result<Comment> {
        Ok(self
            .repository
            .create_comment(target, target_id, content)
            .await?)
    }

    pub async fn update_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        id: i64,
        content: String,
    ) -> Result<Comment> {
        Ok(self
            .repository
            .update_comment(target, target_id, id, content)
            .await?)
    }

    pub async fn delete_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        id: i64,
    ) -> Result<Comment> {
        Ok(self.repository.delete_comment(target, target_id, id).await?)
    }
}
