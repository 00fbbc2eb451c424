//! Route definitions for the market API

use axum::{routing::get, Router};

use super::handlers::{self, articles, comments, products};
use crate::services::Services;

/// Creates the router with all API routes
pub fn routes(services: Services) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        // Health check endpoint
        .route("/health", get(handlers::health_check))
        // Article endpoints
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/articles/{id}",
            get(articles::get_article)
                .patch(articles::update_article)
                .delete(articles::delete_article),
        )
        .route(
            "/articles/{article_id}/comments",
            get(comments::list_article_comments).post(comments::create_article_comment),
        )
        .route(
            "/articles/{article_id}/comments/{comment_id}",
            axum::routing::patch(comments::update_article_comment)
                .delete(comments::delete_article_comment),
        )
        // Product endpoints
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/products/{product_id}/comments",
            get(comments::list_product_comments).post(comments::create_product_comment),
        )
        .route(
            "/products/{product_id}/comments/{comment_id}",
            axum::routing::patch(comments::update_product_comment)
                .delete(comments::delete_product_comment),
        )
        // Add state to all routes
        .with_state(services)
}
