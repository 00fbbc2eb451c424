//! Services module for the market backend

pub mod articles;
pub mod comments;
pub mod health;
pub mod products;

use std::sync::Arc;

use crate::data::market_db::client::DBClient;

use self::{
    articles::ArticleService, comments::CommentService, health::HealthService,
    products::ProductService,
};

/// Container for all backend services, shared as the router state
#[derive(Clone)]
pub struct Services {
    pub health: Arc<HealthService>,
    pub articles: Arc<ArticleService>,
    pub products: Arc<ProductService>,
    pub comments: Arc<CommentService>,
    /// Page size used when a listing request does not give `limit`
    pub default_page_limit: i64,
}

impl Services {
    pub fn new(db: DBClient, default_page_limit: i64) -> Self {
        let db = Arc::new(db);
        Self {
            health: Arc::new(HealthService::new(db.clone())),
            articles: Arc::new(ArticleService::new(db.clone())),
            products: Arc::new(ProductService::new(db.clone())),
            comments: Arc::new(CommentService::new(db)),
            default_page_limit,
        }
    }
}

#[cfg(feature = "mocks")]
impl Services {
    /// Services over an empty in-memory repository with default settings
    pub fn mocks() -> Self {
        use crate::{
            config::PaginationConfig, data::market_db::mock_repository::MockRepository,
        };

        let pagination = PaginationConfig::default();
        let db = DBClient::new(Arc::new(MockRepository::new()), pagination.page_limits());
        Self::new(db, pagination.default_limit)
    }
}

#[cfg(all(test, feature = "mocks"))]
mod tests {
    use std::sync::Arc;

    use market_db::CommentTarget;

    use super::*;
    use crate::{
        constants::test::fixtures::{article_at, comment_at, day, product_at},
        data::market_db::mock_repository::MockRepository,
        error::Error,
        models::{ArticleOrder, CommentRequest, CreateArticleRequest, ProductOrder},
        pagination::PageLimits,
    };

    fn services_over(repo: Arc<MockRepository>) -> Services {
        Services::new(DBClient::new(repo, PageLimits::default()), 10)
    }

    #[tokio::test]
    async fn article_listing_walks_every_page() {
        let repo = Arc::new(MockRepository::new());
        for (id, d) in [(10, 5), (11, 5), (12, 5), (13, 3), (14, 1)] {
            repo.insert_article(article_at(id, day(d))).await;
        }
        let services = services_over(repo);

        let mut ids = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = services
                .articles
                .list(cursor.as_deref(), 2, None, ArticleOrder::Recent)
                .await
                .unwrap();
            ids.extend(page.data.into_iter().map(|a| a.id));
            if !page.has_next {
                assert!(page.next_token.is_none());
                break;
            }
            cursor = page.next_token;
        }

        assert_eq!(ids, ["10", "11", "12", "13", "14"]);
    }

    #[tokio::test]
    async fn product_keyword_and_price_order() {
        let repo = Arc::new(MockRepository::new());
        let mut lamp = product_at(1, 300, day(1));
        lamp.name = "Desk lamp".to_string();
        let mut bulb = product_at(2, 100, day(2));
        bulb.tags = vec!["lamp".to_string()];
        repo.insert_product(lamp).await;
        repo.insert_product(bulb).await;
        repo.insert_product(product_at(3, 50, day(3))).await;
        let services = services_over(repo);

        let page = services
            .products
            .list(None, 10, Some("lamp".to_string()), ProductOrder::PriceAsc)
            .await
            .unwrap();
        let ids: Vec<_> = page.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[tokio::test]
    async fn comments_require_existing_parent() {
        let repo = Arc::new(MockRepository::new());
        repo.insert_article(article_at(1, day(1))).await;
        repo.insert_comment(comment_at(2, CommentTarget::Article, 1, day(2)))
            .await;
        let services = services_over(repo);

        let missing = services
            .comments
            .create(
                CommentTarget::Article,
                99,
                CommentRequest {
                    content: "hello".to_string(),
                },
            )
            .await;
        assert!(matches!(missing, Err(Error::NotFound(_))));

        let page = services
            .comments
            .list(CommentTarget::Article, 1, None, 10)
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);

        // scoped to the parent
        let wrong_parent = services
            .comments
            .delete(CommentTarget::Product, 1, 2)
            .await;
        assert!(matches!(wrong_parent, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn deleting_an_article_removes_its_comments() {
        let services = Services::mocks();
        let article = services
            .articles
            .create(CreateArticleRequest {
                title: "Title".to_string(),
                content: "Body".to_string(),
            })
            .await
            .unwrap();
        let id: i64 = article.id.parse().unwrap();
        let comment = services
            .comments
            .create(
                CommentTarget::Article,
                id,
                CommentRequest {
                    content: "first".to_string(),
                },
            )
            .await
            .unwrap();

        services.articles.delete(id).await.unwrap();

        assert!(matches!(
            services.articles.get(id).await,
            Err(Error::NotFound(_))
        ));
        let comment_id: i64 = comment.id.parse().unwrap();
        assert!(services
            .comments
            .delete(CommentTarget::Article, id, comment_id)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn health_reports_database() {
        let repo = Arc::new(MockRepository::new());
        let services = services_over(repo.clone());
        assert_eq!(services.health.check_health().await.status, "healthy");

        repo.set_unavailable(true);
        let status = services.health.check_health().await;
        assert_eq!(status.status, "unhealthy");
        assert!(status.components.database.message.is_some());
    }
}
