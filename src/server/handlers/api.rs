//! API endpoint handlers.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use super::super::AppState;
use super::error::ApiError;
use crate::scrapers::{FetchRequest, ScrapeResult};

/// Query parameters for the scrape endpoint.
#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    pub url: Option<String>,
}

/// Scrape a single page and return its summary.
pub async fn api_scrape(
    State(state): State<AppState>,
    params: Result<Query<ScrapeParams>, QueryRejection>,
) -> Result<Json<ScrapeResult>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        debug!("Rejected scrape query: {}", rejection);
        ApiError::InvalidUrl
    })?;
    let request = FetchRequest::parse(params.url.as_deref().unwrap_or_default())?;
    info!("Scraping {}", request);

    // Detached: attempts finish even if the client disconnects, and a panic
    // surfaces here as a JoinError.
    let scraper = state.scraper.clone();
    let outcome = tokio::spawn(async move { scraper.scrape(&request).await }).await;

    match outcome {
        Ok(result) => Ok(Json(result?)),
        Err(join_err) => {
            error!("Scrape task failed: {}", join_err);
            Err(ApiError::Failed(join_err.to_string()))
        }
    }
}

/// Liveness check.
pub async fn test() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
