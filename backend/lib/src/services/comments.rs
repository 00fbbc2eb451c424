use std::sync::Arc;

use market_db::{Comment as DBComment, CommentTarget};
use tracing::{debug, info};

use crate::{
    data::market_db::client::DBClient,
    error::Result,
    models::{comment_sort, comments_of, Comment, CommentRequest, PageResponse},
    pagination::Page,
};

/// Service for the comments of articles and products
///
/// Every operation is scoped to a parent: a comment is only visible through
/// the article or product it was written on.
#[derive(Clone)]
pub struct CommentService {
    db: Arc<DBClient>,
}

impl CommentService {
    pub fn new(db: Arc<DBClient>) -> Self {
        Self { db }
    }

    /// Fails with `NotFound` when the parent does not exist.
    async fn ensure_parent(&self, target: CommentTarget, target_id: i64) -> Result<()> {
        match target {
            CommentTarget::Article => self.db.get_article(target_id).await.map(drop),
            CommentTarget::Product => self.db.get_product(target_id).await.map(drop),
        }
    }

    /// One page of the parent's comments, newest first
    pub async fn list(
        &self,
        target: CommentTarget,
        target_id: i64,
        cursor: Option<&str>,
        limit: i64,
    ) -> Result<PageResponse<Comment>> {
        self.ensure_parent(target, target_id).await?;

        debug!(target: "comments::list", %target, target_id, limit, "Listing comments");
        let page: Page<DBComment> = self
            .db
            .fetch_page(&comment_sort()?, comments_of(target, target_id), cursor, limit)
            .await?;
        Ok(PageResponse::from_page(page, Comment::from))
    }

    pub async fn create(
        &self,
        target: CommentTarget,
        target_id: i64,
        request: CommentRequest,
    ) -> Result<Comment> {
        let content = request.validate()?;
        self.ensure_parent(target, target_id).await?;

        let comment = self.db.create_comment(target, target_id, content).await?;
        info!(target: "comments::create", %target, target_id, id = comment.id, "Comment created");
        Ok(comment.into())
    }

    pub async fn update(
        &self,
        target: CommentTarget,
        target_id: i64,
        id: i64,
        request: CommentRequest,
    ) -> Result<Comment> {
        let content = request.validate()?;
        Ok(self
            .db
            .update_comment(target, target_id, id, content)
            .await?
            .into())
    }

    pub async fn delete(&self, target: CommentTarget, target_id: i64, id: i64) -> Result<Comment> {
        let comment = self.db.delete_comment(target, target_id, id).await?;
        info!(target: "comments::delete", %target, target_id, id, "Comment deleted");
        Ok(comment.into())
    }
}
