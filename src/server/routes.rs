//! Router configuration for the web server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/scrape", get(handlers::api_scrape))
        .route("/test", get(handlers::test))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
