//! HTTP API for single-page scrapes.
//!
//! - `GET /api/scrape?url=...` renders the page and returns its summary
//! - `GET /test` liveness check

mod handlers;
mod routes;

pub use handlers::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::scrapers::Scraper;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<Scraper>,
}

impl AppState {
    pub fn new(scraper: Scraper) -> Self {
        Self {
            scraper: Arc::new(scraper),
        }
    }
}

/// Start the web server.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Scraper API running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
