use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use market_db::{
    models::{ArticleChangeset, NewArticle},
    Article as DBArticle,
};

use crate::{
    api::validation::validate_text,
    constants::validation::{MAX_ARTICLE_CONTENT_LEN, MAX_TITLE_LEN},
    error::Error,
    pagination::{FieldAccess, Filter, KeyValue, PaginationError, SortField, SortSpec, ValueKind},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DBArticle> for Article {
    fn from(db: DBArticle) -> Self {
        Self {
            id: db.id.to_string(),
            title: db.title,
            content: db.content,
            created_at: db.created_at.and_utc(),
            updated_at: db.updated_at.and_utc(),
        }
    }
}

impl FieldAccess for DBArticle {
    fn field(&self, name: &str) -> Option<KeyValue> {
        match name {
            "id" => Some(self.id.into()),
            "title" => Some(self.title.as_str().into()),
            "content" => Some(self.content.as_str().into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

/// Order of the article listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArticleOrder {
    /// Newest first
    #[default]
    Recent,
    /// Oldest first
    Oldest,
}

impl ArticleOrder {
    pub fn sort_spec(&self) -> Result<SortSpec, PaginationError> {
        let created_at = match self {
            Self::Recent => SortField::desc("created_at", ValueKind::Timestamp),
            Self::Oldest => SortField::asc("created_at", ValueKind::Timestamp),
        };
        SortSpec::new([created_at, SortField::asc("id", ValueKind::Int)])
    }
}

impl FromStr for ArticleOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(Self::Recent),
            "oldest" => Ok(Self::Oldest),
            other => Err(Error::BadRequest(format!(
                "Unknown order `{other}`, expected recent|oldest"
            ))),
        }
    }
}

/// Matches articles whose title or content contains `keyword`.
pub fn article_keyword_filter(keyword: &str) -> Filter {
    Filter::Or(vec![
        Filter::contains("title", keyword),
        Filter::contains("content", keyword),
    ])
}

/// Query parameters of the article listing, besides `cursor` and `limit`
#[derive(Debug, Default, Deserialize)]
pub struct ArticleListQuery {
    pub keyword: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
}

impl CreateArticleRequest {
    pub fn validate(self) -> Result<NewArticle, Error> {
        validate_text("title", &self.title, MAX_TITLE_LEN)?;
        validate_text("content", &self.content, MAX_ARTICLE_CONTENT_LEN)?;
        Ok(NewArticle {
            title: self.title,
            content: self.content,
        })
    }
}

/// Partial update: absent fields keep their value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdateArticleRequest {
    pub fn validate(self) -> Result<ArticleChangeset, Error> {
        if let Some(title) = &self.title {
            validate_text("title", title, MAX_TITLE_LEN)?;
        }
        if let Some(content) = &self.content {
            validate_text("content", content, MAX_ARTICLE_CONTENT_LEN)?;
        }
        Ok(ArticleChangeset {
            title: self.title,
            content: self.content,
            updated_at: None,
        })
    }
}
