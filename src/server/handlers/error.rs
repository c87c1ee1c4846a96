//! Mapping of scrape outcomes to HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::scrapers::{AttemptFailure, InvalidUrl, ScrapeError};

/// Error returned by the scrape endpoint.
#[derive(Debug)]
pub enum ApiError {
    /// `url` missing or not an absolute http(s) URL.
    InvalidUrl,
    /// Every attempt timed out.
    Timeout,
    /// Any other failure, with a human-readable detail.
    Failed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InvalidUrl> for ApiError {
    fn from(_: InvalidUrl) -> Self {
        ApiError::InvalidUrl
    }
}

impl From<ScrapeError> for ApiError {
    fn from(err: ScrapeError) -> Self {
        match err.failure() {
            AttemptFailure::Timeout => ApiError::Timeout,
            AttemptFailure::Other => ApiError::Failed(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::InvalidUrl => json!({ "error": "Invalid URL" }),
            ApiError::Timeout => json!({ "error": "Timeout" }),
            ApiError::Failed(details) => json!({
                "error": "Failed to scrape page",
                "details": details,
            }),
        };
        (status, Json(body)).into_response()
    }
}
