use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use market_db::{Comment as DBComment, CommentTarget};

use crate::{
    api::validation::validate_text,
    constants::validation::MAX_COMMENT_LEN,
    error::Error,
    pagination::{FieldAccess, Filter, KeyValue, PaginationError, SortField, SortSpec, ValueKind},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DBComment> for Comment {
    fn from(db: DBComment) -> Self {
        Self {
            id: db.id.to_string(),
            content: db.content,
            created_at: db.created_at.and_utc(),
            updated_at: db.updated_at.and_utc(),
        }
    }
}

impl FieldAccess for DBComment {
    fn field(&self, name: &str) -> Option<KeyValue> {
        match name {
            "id" => Some(self.id.into()),
            "target_kind" => Some(self.target_kind.as_str().into()),
            "target_id" => Some(self.target_id.into()),
            "content" => Some(self.content.as_str().into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

/// Comments are listed newest first.
pub fn comment_sort() -> Result<SortSpec, PaginationError> {
    SortSpec::new([
        SortField::desc("created_at", ValueKind::Timestamp),
        SortField::asc("id", ValueKind::Int),
    ])
}

/// Matches the comments attached to one parent.
pub fn comments_of(target: CommentTarget, target_id: i64) -> Filter {
    Filter::eq("target_kind", target.as_str()).and(Filter::eq("target_id", target_id))
}

/// Body of comment creation and update
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

impl CommentRequest {
    pub fn validate(self) -> Result<String, Error> {
        validate_text("content", &self.content, MAX_COMMENT_LEN)?;
        Ok(self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test::fixtures::{comment_at, day};

    #[test]
    fn parent_filter_scopes_by_kind_and_id() {
        let on_article = comment_at(1, CommentTarget::Article, 5, day(1));
        let on_product = comment_at(2, CommentTarget::Product, 5, day(1));
        let on_other_article = comment_at(3, CommentTarget::Article, 6, day(1));

        let filter = comments_of(CommentTarget::Article, 5);
        assert!(filter.matches(&on_article));
        assert!(!filter.matches(&on_product));
        assert!(!filter.matches(&on_other_article));
    }

    #[test]
    fn response_hides_parent() {
        let value =
            serde_json::to_value(Comment::from(comment_at(9, CommentTarget::Product, 1, day(4))))
                .unwrap();
        assert_eq!(value["id"], "9");
        assert_eq!(value["createdAt"], "2024-01-04T00:00:00Z");
        assert!(value.get("targetId").is_none());
    }

    #[test]
    fn content_bounds() {
        let ok = CommentRequest {
            content: "nice".to_string(),
        };
        assert_eq!(ok.validate().unwrap(), "nice");

        let too_long = CommentRequest {
            content: "x".repeat(MAX_COMMENT_LEN + 1),
        };
        assert!(too_long.validate().is_err());
        assert!(CommentRequest {
            content: String::new()
        }
        .validate()
        .is_err());
    }
}
