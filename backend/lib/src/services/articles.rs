use std::sync::Arc;

use market_db::Article as DBArticle;
use tracing::{debug, info};

use crate::{
    api::validation::normalize_keyword,
    data::market_db::client::DBClient,
    error::Result,
    models::{
        article_keyword_filter, Article, ArticleOrder, CreateArticleRequest, PageResponse,
        UpdateArticleRequest,
    },
    pagination::{Filter, Page},
};

/// Service for article CRUD and the paginated article listing
#[derive(Clone)]
pub struct ArticleService {
    db: Arc<DBClient>,
}

impl ArticleService {
    pub fn new(db: Arc<DBClient>) -> Self {
        Self { db }
    }

    /// One page of articles, optionally narrowed to those matching `keyword`
    pub async fn list(
        &self,
        cursor: Option<&str>,
        limit: i64,
        keyword: Option<String>,
        order: ArticleOrder,
    ) -> Result<PageResponse<Article>> {
        let filter = match normalize_keyword(keyword)? {
            Some(keyword) => article_keyword_filter(&keyword),
            None => Filter::All,
        };
        let sort = order.sort_spec()?;

        debug!(target: "articles::list", ?order, limit, "Listing articles");
        let page: Page<DBArticle> = self.db.fetch_page(&sort, filter, cursor, limit).await?;
        Ok(PageResponse::from_page(page, Article::from))
    }

    pub async fn get(&self, id: i64) -> Result<Article> {
        Ok(self.db.get_article(id).await?.into())
    }

    pub async fn create(&self, request: CreateArticleRequest) -> Result<Article> {
        let article = self.db.create_article(request.validate()?).await?;
        info!(target: "articles::create", id = article.id, "Article created");
        Ok(article.into())
    }

    pub async fn update(&self, id: i64, request: UpdateArticleRequest) -> Result<Article> {
        Ok(self.db.update_article(id, request.validate()?).await?.into())
    }

    /// Deletes the article together with its comments
    pub async fn delete(&self, id: i64) -> Result<Article> {
        let article = self.db.delete_article(id).await?;
        info!(target: "articles::delete", id, "Article deleted");
        Ok(article.into())
    }
}
