use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{schema::comment, DbConnection};

/// The kind of entity a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentTarget {
    Article,
    Product,
}

impl CommentTarget {
    /// Value stored in the `target_kind` column
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Product => "product",
        }
    }
}

impl fmt::Display for CommentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(Self::Article),
            "product" => Ok(Self::Product),
            other => Err(format!("unknown comment target: {other}")),
        }
    }
}

/// Table that holds the Comments of both articles and products.
///
/// The parent is identified by (`target_kind`, `target_id`).
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = comment)]
pub struct Comment {
    pub id: i64,
    pub target_kind: String,
    pub target_id: i64,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Comment {
    /// The parsed parent kind, `None` if the column holds an unknown value.
    pub fn target(&self) -> Option<CommentTarget> {
        self.target_kind.parse().ok()
    }

    /// Whether this comment belongs to the given parent.
    pub fn belongs_to(&self, target: CommentTarget, target_id: i64) -> bool {
        self.target_kind == target.as_str() && self.target_id == target_id
    }

    pub async fn create<'a>(
        conn: &mut DbConnection<'a>,
        target: CommentTarget,
        target_id: i64,
        content: String,
    ) -> Result<Self, diesel::result::Error> {
        let comment = diesel::insert_into(comment::table)
            .values((
                comment::target_kind.eq(target.as_str()),
                comment::target_id.eq(target_id),
                comment::content.eq(content),
            ))
            .returning(Comment::as_select())
            .get_result(conn)
            .await?;
        Ok(comment)
    }

    /// Updates the content of a comment, scoped to its parent.
    pub async fn update_content<'a>(
        conn: &mut DbConnection<'a>,
        target: CommentTarget,
        target_id: i64,
        id: i64,
        content: String,
        updated_at: NaiveDateTime,
    ) -> Result<Option<Self>, diesel::result::Error> {
        diesel::update(
            comment::table
                .filter(comment::id.eq(id))
                .filter(comment::target_kind.eq(target.as_str()))
                .filter(comment::target_id.eq(target_id)),
        )
        .set((comment::content.eq(content), comment::updated_at.eq(updated_at)))
        .returning(Comment::as_select())
        .get_result(conn)
        .await
        .optional()
    }

    /// Deletes a comment, scoped to its parent.
    pub async fn delete<'a>(
        conn: &mut DbConnection<'a>,
        target: CommentTarget,
        target_id: i64,
        id: i64,
    ) -> Result<Option<Self>, diesel::result::Error> {
        diesel::delete(
            comment::table
                .filter(comment::id.eq(id))
                .filter(comment::target_kind.eq(target.as_str()))
                .filter(comment::target_id.eq(target_id)),
        )
        .returning(Comment::as_select())
        .get_result(conn)
        .await
        .optional()
    }

    /// Deletes every comment of a parent, returning how many were removed.
    pub async fn delete_all_of<'a>(
        conn: &mut DbConnection<'a>,
        target: CommentTarget,
        target_id: i64,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(
            comment::table
                .filter(comment::target_kind.eq(target.as_str()))
                .filter(comment::target_id.eq(target_id)),
        )
        .execute(conn)
        .await
    }
}
