use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{error::Error, services::Services};

pub mod articles;
pub mod comments;
pub mod pagination;
pub mod products;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "API Server",
        "endpoints": ["/articles", "/products"],
    }))
}

pub async fn health_check(State(services): State<Services>) -> Result<impl IntoResponse, Error> {
    let response = services.health.check_health().await;
    Ok(Json(response))
}
