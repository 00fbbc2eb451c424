//! This module contains the handlers for the article endpoints

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use super::pagination::CursorPagination;
use crate::{
    api::validation::parse_id,
    error::Error,
    models::{ArticleListQuery, ArticleOrder, CreateArticleRequest, UpdateArticleRequest},
    services::Services,
};

pub async fn list_articles(
    State(services): State<Services>,
    pagination: CursorPagination,
    Query(query): Query<ArticleListQuery>,
) -> Result<impl IntoResponse, Error> {
    let order = match query.order.as_deref() {
        Some(order) => order.parse::<ArticleOrder>()?,
        None => ArticleOrder::default(),
    };
    let response = services
        .articles
        .list(
            pagination.cursor.as_deref(),
            pagination.limit,
            query.keyword,
            order,
        )
        .await?;
    Ok(Json(response))
}

pub async fn create_article(
    State(services): State<Services>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<impl IntoResponse, Error> {
    let response = services.articles.create(payload).await?;
    Ok(Json(response))
}

pub async fn get_article(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let response = services.articles.get(parse_id(&id)?).await?;
    Ok(Json(response))
}

pub async fn update_article(
    State(services): State<Services>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<impl IntoResponse, Error> {
    let response = services.articles.update(parse_id(&id)?, payload).await?;
    Ok(Json(response))
}

pub async fn delete_article(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let response = services.articles.delete(parse_id(&id)?).await?;
    Ok(Json(response))
}
