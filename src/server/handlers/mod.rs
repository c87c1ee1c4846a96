//! HTTP request handlers for the web server.

mod api;
mod error;

// Re-export handlers for use by the router
pub use api::{api_scrape, test};
pub use error::ApiError;
