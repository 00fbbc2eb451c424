//! This module contains the handlers for the product endpoints

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use super::pagination::CursorPagination;
use crate::{
    api::validation::parse_id,
    error::Error,
    models::{CreateProductRequest, ProductListQuery, ProductOrder, UpdateProductRequest},
    services::Services,
};

pub async fn list_products(
    State(services): State<Services>,
    pagination: CursorPagination,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, Error> {
    let order = match query.order.as_deref() {
        Some(order) => order.parse::<ProductOrder>()?,
        None => ProductOrder::default(),
    };
    let response = services
        .products
        .list(
            pagination.cursor.as_deref(),
            pagination.limit,
            query.keyword,
            order,
        )
        .await?;
    Ok(Json(response))
}

pub async fn create_product(
    State(services): State<Services>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, Error> {
    let response = services.products.create(payload).await?;
    Ok(Json(response))
}

pub async fn get_product(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let response = services.products.get(parse_id(&id)?).await?;
    Ok(Json(response))
}

pub async fn update_product(
    State(services): State<Services>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, Error> {
    let response = services.products.update(parse_id(&id)?, payload).await?;
    Ok(Json(response))
}

pub async fn delete_product(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let response = services.products.delete(parse_id(&id)?).await?;
    Ok(Json(response))
}
