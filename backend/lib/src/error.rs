use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::{data::market_db::repository::error::RepositoryError, pagination::PaginationError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Pagination(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Config(_) | Error::Pagination(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity } => Error::NotFound(format!("{entity} not found")),
            RepositoryError::InvalidInput(msg) => Error::BadRequest(msg),
            err if err.is_constraint_violation() => Error::BadRequest(err.to_string()),
            err => Error::Database(err.to_string()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            Error::BadRequest(msg) => msg,
            Error::NotFound(msg) => msg,
            Error::Database(msg) => msg,
            Error::Config(msg) => msg,
            Error::Pagination(e) => e.to_string(),
        };

        if status.is_server_error() {
            error!(target: "market-backend::api", status = %status, error = %message, "Request failed");
        }

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_errors_split_by_blame() {
        let client = Error::from(PaginationError::MalformedToken("not valid base64"));
        assert_eq!(client.status_code(), StatusCode::BAD_REQUEST);

        let limit = Error::from(PaginationError::InvalidLimit { limit: 0, max: 100 });
        assert_eq!(limit.status_code(), StatusCode::BAD_REQUEST);

        let spec = Error::from(PaginationError::InvalidSortSpec("empty".to_string()));
        assert_eq!(spec.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let source = Error::from(PaginationError::RecordSource(Box::new(
            RepositoryError::Pool("exhausted".to_string()),
        )));
        assert_eq!(source.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn repository_errors_map_to_statuses() {
        let missing = Error::from(RepositoryError::not_found("Article"));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.to_string(), "Not found: Article not found");

        let invalid = Error::from(RepositoryError::invalid_input("price must not be negative"));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let pool = Error::from(RepositoryError::Pool("exhausted".to_string()));
        assert_eq!(pool.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn server_errors_use_the_error_envelope() {
        let response = Error::from(RepositoryError::Pool("exhausted".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "Pool error: exhausted" }));
    }
}
