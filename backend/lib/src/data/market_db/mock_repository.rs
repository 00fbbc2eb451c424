//! Mock repository implementation for unit testing.
//!
//! Provides an in-memory implementation of the repository pattern that mimics
//! database operations without requiring a real database connection.
//! Timestamps are truncated to microseconds, the precision of the real store,
//! so continuation tokens behave the same against both.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicI64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{NaiveDateTime, SubsecRound, Utc};
use tokio::sync::RwLock;

use market_db::{
    models::{ArticleChangeset, NewArticle, NewProduct, ProductChangeset},
    Article, Comment, CommentTarget, Product,
};

use crate::{
    data::market_db::repository::{
        error::{RepositoryError, RepositoryResult},
        MarketOps,
    },
    pagination::{FieldAccess, Filter, RecordSource, SortSpec},
};

/// Mock repository implementation using in-memory storage
pub struct MockRepository {
    articles: Arc<RwLock<HashMap<i64, Article>>>,
    products: Arc<RwLock<HashMap<i64, Product>>>,
    comments: Arc<RwLock<HashMap<i64, Comment>>>,
    next_id: Arc<AtomicI64>,
    unavailable: Arc<AtomicBool>,
}

impl MockRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            articles: Arc::new(RwLock::new(HashMap::new())),
            products: Arc::new(RwLock::new(HashMap::new())),
            comments: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Generate next unique ID
    pub fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Make every following operation fail, as if the database went away
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Store a fully specified article, keeping its id and timestamps
    pub async fn insert_article(&self, article: Article) {
        self.bump_next_id(article.id);
        self.articles.write().await.insert(article.id, article);
    }

    /// Store a fully specified product, keeping its id and timestamps
    pub async fn insert_product(&self, product: Product) {
        self.bump_next_id(product.id);
        self.products.write().await.insert(product.id, product);
    }

    /// Store a fully specified comment, keeping its id and timestamps
    pub async fn insert_comment(&self, comment: Comment) {
        self.bump_next_id(comment.id);
        self.comments.write().await.insert(comment.id, comment);
    }

    fn bump_next_id(&self, used: i64) {
        self.next_id.fetch_max(used + 1, Ordering::SeqCst);
    }

    fn check_available(&self) -> RepositoryResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "mock repository set as unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc().trunc_subsecs(6)
    }

    async fn drop_comments_of(&self, target: CommentTarget, target_id: i64) {
        self.comments
            .write()
            .await
            .retain(|_, comment| !comment.belongs_to(target, target_id));
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluates `filter` over `rows` the way the database would.
fn select<R>(rows: &HashMap<i64, R>, filter: &Filter, order_by: &SortSpec, limit: i64) -> Vec<R>
where
    R: FieldAccess + Clone,
{
    let mut selected: Vec<R> = rows
        .values()
        .filter(|row| filter.matches(*row))
        .cloned()
        .collect();
    selected.sort_by(|a, b| order_by.compare(a, b));
    selected.truncate(limit.max(0) as usize);
    selected
}

#[async_trait]
impl MarketOps for MockRepository {
    async fn ping(&self) -> RepositoryResult<()> {
        self.check_available()
    }

    // ============ Articles ============
    async fn create_article(&self, new: NewArticle) -> RepositoryResult<Article> {
        self.check_available()?;

        let now = Self::now();
        let article = Article {
            id: self.next_id(),
            title: new.title,
            content: new.content,
            created_at: now,
            updated_at: now,
        };
        self.articles
            .write()
            .await
            .insert(article.id, article.clone());

        Ok(article)
    }

    async fn get_article(&self, id: i64) -> RepositoryResult<Article> {
        self.check_available()?;

        self.articles
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Article"))
    }

    async fn update_article(
        &self,
        id: i64,
        changes: ArticleChangeset,
    ) -> RepositoryResult<Article> {
        self.check_available()?;

        let mut articles = self.articles.write().await;
        let article = articles
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("Article"))?;

        if let Some(title) = changes.title {
            article.title = title;
        }
        if let Some(content) = changes.content {
            article.content = content;
        }
        article.updated_at = Self::now();

        Ok(article.clone())
    }

    async fn delete_article(&self, id: i64) -> RepositoryResult<Article> {
        self.check_available()?;

        let article = self
            .articles
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| RepositoryError::not_found("Article"))?;
        self.drop_comments_of(CommentTarget::Article, id).await;

        Ok(article)
    }

    // ============ Products ============
    async fn create_product(&self, new: NewProduct) -> RepositoryResult<Product> {
        self.check_available()?;

        if new.price < 0 {
            return Err(RepositoryError::invalid_input("price must not be negative"));
        }

        let now = Self::now();
        let product = Product {
            id: self.next_id(),
            name: new.name,
            description: new.description,
            price: new.price,
            tags: new.tags,
            created_at: now,
            updated_at: now,
        };
        self.products
            .write()
            .await
            .insert(product.id, product.clone());

        Ok(product)
    }

    async fn get_product(&self, id: i64) -> RepositoryResult<Product> {
        self.check_available()?;

        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Product"))
    }

    async fn update_product(
        &self,
        id: i64,
        changes: ProductChangeset,
    ) -> RepositoryResult<Product> {
        self.check_available()?;

        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("Product"))?;

        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(tags) = changes.tags {
            product.tags = tags;
        }
        product.updated_at = Self::now();

        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64) -> RepositoryResult<Product> {
        self.check_available()?;

        let product = self
            .products
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| RepositoryError::not_found("Product"))?;
        self.drop_comments_of(CommentTarget::Product, id).await;

        Ok(product)
    }

    // ============ Comments ============
    async fn create_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        content: String,
    ) -> RepositoryResult<Comment> {
        self.check_available()?;

        let now = Self::now();
        let comment = Comment {
            id: self.next_id(),
            target_kind: target.as_str().to_string(),
            target_id,
            content,
            created_at: now,
            updated_at: now,
        };
        self.comments
            .write()
            .await
            .insert(comment.id, comment.clone());

        Ok(comment)
    }

    async fn update_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        id: i64,
        content: String,
    ) -> RepositoryResult<Comment> {
        self.check_available()?;

        let mut comments = self.comments.write().await;
        let comment = comments
            .get_mut(&id)
            .filter(|comment| comment.belongs_to(target, target_id))
            .ok_or_else(|| RepositoryError::not_found("Comment"))?;

        comment.content = content;
        comment.updated_at = Self::now();

        Ok(comment.clone())
    }

    async fn delete_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        id: i64,
    ) -> RepositoryResult<Comment> {
        self.check_available()?;

        let mut comments = self.comments.write().await;
        match comments.get(&id) {
            Some(comment) if comment.belongs_to(target, target_id) => {}
            _ => return Err(RepositoryError::not_found("Comment")),
        }

        comments
            .remove(&id)
            .ok_or_else(|| RepositoryError::not_found("Comment"))
    }
}

#[async_trait]
impl RecordSource<Article> for MockRepository {
    type Error = RepositoryError;

    async fn find(
        &self,
        filter: Filter,
        order_by: &SortSpec,
        limit: i64,
    ) -> RepositoryResult<Vec<Article>> {
        self.check_available()?;
        Ok(select(&*self.articles.read().await, &filter, order_by, limit))
    }
}

#[async_trait]
impl RecordSource<Product> for MockRepository {
    type Error = RepositoryError;

    async fn find(
        &self,
        filter: Filter,
        order_by: &SortSpec,
        limit: i64,
    ) -> RepositoryResult<Vec<Product>> {
        self.check_available()?;
        Ok(select(&*self.products.read().await, &filter, order_by, limit))
    }
}

#[async_trait]
impl RecordSource<Comment> for MockRepository {
    type Error = RepositoryError;

    async fn find(
        &self,
        filter: Filter,
        order_by: &SortSpec,
        limit: i64,
    ) -> RepositoryResult<Vec<Comment>> {
        self.check_available()?;
        Ok(select(&*self.comments.read().await, &filter, order_by, limit))
    }
}
