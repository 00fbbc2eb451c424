//! This module contains the handlers for the comment endpoints of articles and products

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use market_db::CommentTarget;

use super::pagination::CursorPagination;
use crate::{
    api::validation::parse_id, error::Error, models::CommentRequest, services::Services,
};

async fn list(
    services: Services,
    target: CommentTarget,
    target_id: &str,
    pagination: CursorPagination,
) -> Result<impl IntoResponse, Error> {
    let response = services
        .comments
        .list(
            target,
            parse_id(target_id)?,
            pagination.cursor.as_deref(),
            pagination.limit,
        )
        .await?;
    Ok(Json(response))
}

async fn create(
    services: Services,
    target: CommentTarget,
    target_id: &str,
    payload: CommentRequest,
) -> Result<impl IntoResponse, Error> {
    let response = services
        .comments
        .create(target, parse_id(target_id)?, payload)
        .await?;
    Ok(Json(response))
}

async fn update(
    services: Services,
    target: CommentTarget,
    (target_id, id): (String, String),
    payload: CommentRequest,
) -> Result<impl IntoResponse, Error> {
    let response = services
        .comments
        .update(target, parse_id(&target_id)?, parse_id(&id)?, payload)
        .await?;
    Ok(Json(response))
}

async fn delete(
    services: Services,
    target: CommentTarget,
    (target_id, id): (String, String),
) -> Result<impl IntoResponse, Error> {
    let response = services
        .comments
        .delete(target, parse_id(&target_id)?, parse_id(&id)?)
        .await?;
    Ok(Json(response))
}

// ==================== Article Comments ====================

pub async fn list_article_comments(
    State(services): State<Services>,
    Path(article_id): Path<String>,
    pagination: CursorPagination,
) -> Result<impl IntoResponse, Error> {
    list(services, CommentTarget::Article, &article_id, pagination).await
}

pub async fn create_article_comment(
    State(services): State<Services>,
    Path(article_id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, Error> {
    create(services, CommentTarget::Article, &article_id, payload).await
}

pub async fn update_article_comment(
    State(services): State<Services>,
    Path(ids): Path<(String, String)>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, Error> {
    update(services, CommentTarget::Article, ids, payload).await
}

pub async fn delete_article_comment(
    State(services): State<Services>,
    Path(ids): Path<(String, String)>,
) -> Result<impl IntoResponse, Error> {
    delete(services, CommentTarget::Article, ids).await
}

// ==================== Product Comments ====================

pub async fn list_product_comments(
    State(services): State<Services>,
    Path(product_id): Path<String>,
    pagination: CursorPagination,
) -> Result<impl IntoResponse, Error> {
    list(services, CommentTarget::Product, &product_id, pagination).await
}

pub async fn create_product_comment(
    State(services): State<Services>,
    Path(product_id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, Error> {
    create(services, CommentTarget::Product, &product_id, payload).await
}

pub async fn update_product_comment(
    State(services): State<Services>,
    Path(ids): Path<(String, String)>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, Error> {
    update(services, CommentTarget::Product, ids, payload).await
}

pub async fn delete_product_comment(
    State(services): State<Services>,
    Path(ids): Path<(String, String)>,
) -> Result<impl IntoResponse, Error> {
    delete(services, CommentTarget::Product, ids).await
}
