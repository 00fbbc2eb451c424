//! PostgreSQL repository implementation.
//!
//! This module provides the production repository implementation using
//! PostgreSQL as the backing database through diesel-async.
//!
//! ## Features
//! - bb8 connection pooling sized from the database configuration
//! - Listing through [`RecordSource`], translated to keyset queries in `query`

use async_trait::async_trait;
use chrono::Utc;
use diesel_async::{AsyncConnection, RunQueryDsl};
use market_db::{
    models::{ArticleChangeset, NewArticle, NewProduct, ProductChangeset},
    Article, Comment, CommentTarget, Product,
};

use crate::{
    data::market_db::repository::{
        error::{RepositoryError, RepositoryResult},
        pool::{ConnectionPool, PoolSettings},
        query, MarketOps,
    },
    pagination::{Filter, RecordSource, SortSpec},
};

/// PostgreSQL repository implementation.
///
/// Provides all database operations over a [`ConnectionPool`].
pub struct Repository {
    pool: ConnectionPool,
}

impl Repository {
    /// Create a new Repository with the given database URL.
    pub async fn new(database_url: &str, settings: PoolSettings) -> RepositoryResult<Self> {
        Ok(Self {
            pool: ConnectionPool::new(database_url, settings).await?,
        })
    }
}

#[async_trait]
impl MarketOps for Repository {
    async fn ping(&self) -> RepositoryResult<()> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1").execute(&mut conn).await?;
        Ok(())
    }

    // ============ Articles ============
    async fn create_article(&self, new: NewArticle) -> RepositoryResult<Article> {
        let mut conn = self.pool.get().await?;
        Ok(Article::create(&mut conn, new).await?)
    }

    async fn get_article(&self, id: i64) -> RepositoryResult<Article> {
        let mut conn = self.pool.get().await?;
        Article::get_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Article"))
    }

    async fn update_article(
        &self,
        id: i64,
        mut changes: ArticleChangeset,
    ) -> RepositoryResult<Article> {
        let mut conn = self.pool.get().await?;
        changes.updated_at = Some(Utc::now().naive_utc());

        Article::update(&mut conn, id, changes)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Article"))
    }

    async fn delete_article(&self, id: i64) -> RepositoryResult<Article> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<Article, RepositoryError, _>(move |conn| {
            Box::pin(async move {
                let article = Article::delete(conn, id)
                    .await?
                    .ok_or_else(|| RepositoryError::not_found("Article"))?;
                Comment::delete_all_of(conn, CommentTarget::Article, id).await?;
                Ok(article)
            })
        })
        .await
    }

    // ============ Products ============
    async fn create_product(&self, new: NewProduct) -> RepositoryResult<Product> {
        let mut conn = self.pool.get().await?;
        Ok(Product::create(&mut conn, new).await?)
    }

    async fn get_product(&self, id: i64) -> RepositoryResult<Product> {
        let mut conn = self.pool.get().await?;
        Product::get_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Product"))
    }

    async fn update_product(
        &self,
        id: i64,
        mut changes: ProductChangeset,
    ) -> RepositoryResult<Product> {
        let mut conn = self.pool.get().await?;
        changes.updated_at = Some(Utc::now().naive_utc());

        Product::update(&mut conn, id, changes)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Product"))
    }

    async fn delete_product(&self, id: i64) -> RepositoryResult<Product> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<Product, RepositoryError, _>(move |conn| {
            Box::pin(async move {
                let product = Product::delete(conn, id)
                    .await?
                    .ok_or_else(|| RepositoryError::not_found("Product"))?;
                Comment::delete_all_of(conn, CommentTarget::Product, id).await?;
                Ok(product)
            })
        })
        .await
    }

    // ============ Comments ============
    async fn create_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        content: String,
    ) -> RepositoryResult<Comment> {
        let mut conn = self.pool.get().await?;
        Ok(Comment::create(&mut conn, target, target_id, content).await?)
    }

    async fn update_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        id: i64,
        content: String,
    ) -> RepositoryResult<Comment> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().naive_utc();

        Comment::update_content(&mut conn, target, target_id, id, content, now)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Comment"))
    }

    async fn delete_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        id: i64,
    ) -> RepositoryResult<Comment> {
        let mut conn = self.pool.get().await?;
        Comment::delete(&mut conn, target, target_id, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Comment"))
    }
}

#[async_trait]
impl RecordSource<Article> for Repository {
    type Error = RepositoryError;

    async fn find(
        &self,
        filter: Filter,
        order_by: &SortSpec,
        limit: i64,
    ) -> RepositoryResult<Vec<Article>> {
        let mut conn = self.pool.get().await?;
        query::find_articles(&mut conn, filter, order_by, limit).await
    }
}

#[async_trait]
impl RecordSource<Product> for Repository {
    type Error = RepositoryError;

    async fn find(
        &self,
        filter: Filter,
        order_by: &SortSpec,
        limit: i64,
    ) -> RepositoryResult<Vec<Product>> {
        let mut conn = self.pool.get().await?;
        query::find_products(&mut conn, filter, order_by, limit).await
    }
}

#[async_trait]
impl RecordSource<Comment> for Repository {
    type Error = RepositoryError;

    async fn find(
        &self,
        filter: Filter,
        order_by: &SortSpec,
        limit: i64,
    ) -> RepositoryResult<Vec<Comment>> {
        let mut conn = self.pool.get().await?;
        query::find_comments(&mut conn, filter, order_by, limit).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testcontainers::ContainerAsync;
    use testcontainers_modules::postgres::Postgres;

    use super::*;
    use crate::{
        data::market_db::test_helpers::setup_test_db,
        models::{
            articles::ArticleOrder,
            comments::comment_sort,
            products::{product_keyword_filter, ProductOrder},
        },
        pagination::{CompareOp, PageAssembler, PageLimits},
    };

    async fn repository() -> (ContainerAsync<Postgres>, Repository) {
        repository_with(vec![]).await
    }

    async fn repository_with(post_migrations: Vec<String>) -> (ContainerAsync<Postgres>, Repository) {
        let (container, url) = setup_test_db(post_migrations).await;
        let settings = PoolSettings {
            max_size: 2,
            min_idle: None,
            connection_timeout: std::time::Duration::from_secs(5),
            idle_timeout: None,
            max_lifetime: None,
            tls: false,
        };
        let repo = Repository::new(&url, settings).await.expect("db available");
        (container, repo)
    }

    fn new_article(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            content: format!("{title} body"),
        }
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn article_crud() {
        let (_container, repo) = repository().await;

        let created = repo.create_article(new_article("first")).await.unwrap();
        assert_eq!(repo.get_article(created.id).await.unwrap(), created);

        let updated = repo
            .update_article(
                created.id,
                ArticleChangeset {
                    title: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.content, created.content);

        repo.delete_article(created.id).await.unwrap();
        assert!(repo.get_article(created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn comments_are_scoped_to_their_parent() {
        let (_container, repo) = repository().await;

        let article = repo.create_article(new_article("parent")).await.unwrap();
        let comment = repo
            .create_comment(CommentTarget::Article, article.id, "hi".to_string())
            .await
            .unwrap();

        let err = repo
            .delete_comment(CommentTarget::Product, article.id, comment.id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = repo
            .update_comment(CommentTarget::Article, article.id + 1, comment.id, "x".to_string())
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        repo.delete_article(article.id).await.unwrap();
        let remaining: Vec<Comment> = repo
            .find(Filter::All, &comment_sort().unwrap(), 10)
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn failed_cascade_keeps_the_parent() {
        let (_container, repo) = repository_with(vec![
            r#"CREATE FUNCTION refuse_locked_comment() RETURNS trigger AS $$
               BEGIN
                   IF OLD.content = 'locked' THEN
                       RAISE EXCEPTION 'comment is locked';
                   END IF;
                   RETURN OLD;
               END;
               $$ LANGUAGE plpgsql"#
                .to_string(),
            "CREATE TRIGGER comment_lock BEFORE DELETE ON comment \
             FOR EACH ROW EXECUTE FUNCTION refuse_locked_comment()"
                .to_string(),
        ])
        .await;

        let article = repo.create_article(new_article("parent")).await.unwrap();
        repo.create_comment(CommentTarget::Article, article.id, "locked".to_string())
            .await
            .unwrap();

        let err = repo.delete_article(article.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Database(_)));

        assert_eq!(repo.get_article(article.id).await.unwrap(), article);
        let remaining: Vec<Comment> = repo
            .find(Filter::All, &comment_sort().unwrap(), 10)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn walks_articles_with_tied_timestamps() {
        let (_container, repo) = repository_with(vec![
            "INSERT INTO article (id, title, content, created_at, updated_at) \
             SELECT i, 'a' || i, 'body', TIMESTAMP '2024-01-01', TIMESTAMP '2024-01-01' \
             FROM generate_series(1, 5) AS i"
                .to_string(),
        ])
        .await;
        let ids: Vec<i64> = (1..=5).collect();

        let assembler = PageAssembler::new(Arc::new(repo), PageLimits::default());
        let sort = ArticleOrder::Recent.sort_spec().unwrap();

        let mut seen = Vec::new();
        let mut token = None;
        loop {
            let page = assembler
                .fetch_page::<Article>(&sort, Filter::All, token.as_deref(), 2)
                .await
                .unwrap();
            seen.extend(page.items.iter().map(|a| a.id));
            if !page.has_next {
                break;
            }
            token = page.next_token;
        }

        assert_eq!(seen, ids);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn product_keyword_and_price_order() {
        let (_container, repo) = repository().await;

        for (name, price, tags) in [
            ("oak desk", 300, vec!["furniture"]),
            ("lamp", 40, vec!["desk", "light"]),
            ("chair", 120, vec!["furniture"]),
        ] {
            repo.create_product(NewProduct {
                name: name.to_string(),
                description: String::new(),
                price,
                tags: tags.into_iter().map(String::from).collect(),
            })
            .await
            .unwrap();
        }

        let keyword = product_keyword_filter("desk");
        let found: Vec<Product> = repo
            .find(keyword, &ProductOrder::PriceAsc.sort_spec().unwrap(), 10)
            .await
            .unwrap();
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["lamp", "oak desk"]);

        let cheap: Vec<Product> = repo
            .find(
                Filter::compare("price", CompareOp::Lt, 200),
                &ProductOrder::PriceDesc.sort_spec().unwrap(),
                10,
            )
            .await
            .unwrap();
        let names: Vec<_> = cheap.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["chair", "lamp"]);
    }
}
