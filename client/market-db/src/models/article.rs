use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{schema::article, DbConnection};

/// Table that holds the Articles.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = article)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insert payload for [`Article::create`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = article)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
}

/// Partial update of an Article; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = article)]
pub struct ArticleChangeset {
    pub title: Option<String>,
    pub content: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Article {
    pub async fn create<'a>(
        conn: &mut DbConnection<'a>,
        new_article: NewArticle,
    ) -> Result<Self, diesel::result::Error> {
        let article = diesel::insert_into(article::table)
            .values(&new_article)
            .returning(Article::as_select())
            .get_result(conn)
            .await?;
        Ok(article)
    }

    pub async fn get_by_id<'a>(
        conn: &mut DbConnection<'a>,
        id: i64,
    ) -> Result<Option<Self>, diesel::result::Error> {
        article::table
            .filter(article::id.eq(id))
            .select(Article::as_select())
            .first(conn)
            .await
            .optional()
    }

    /// Returns `None` when no article has the given id.
    pub async fn update<'a>(
        conn: &mut DbConnection<'a>,
        id: i64,
        changes: ArticleChangeset,
    ) -> Result<Option<Self>, diesel::result::Error> {
        diesel::update(article::table.filter(article::id.eq(id)))
            .set(&changes)
            .returning(Article::as_select())
            .get_result(conn)
            .await
            .optional()
    }

    /// Returns the deleted row, `None` when no article has the given id.
    pub async fn delete<'a>(
        conn: &mut DbConnection<'a>,
        id: i64,
    ) -> Result<Option<Self>, diesel::result::Error> {
        diesel::delete(article::table.filter(article::id.eq(id)))
            .returning(Article::as_select())
            .get_result(conn)
            .await
            .optional()
    }
}
