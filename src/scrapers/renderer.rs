//! Renderer seams driven by the orchestrator.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::error::ScrapeError;
use super::types::{ExtractionResult, Identity, NavigationOutcome};

/// Launches isolated renderer sessions, one per attempt.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Start a fresh browser process with one blank page.
    async fn open(&self) -> Result<Box<dyn RendererSession>, ScrapeError>;
}

/// One browser process plus one page, owned by a single attempt.
#[async_trait]
pub trait RendererSession: Send {
    /// Apply user agent and viewport. Must run before `navigate`.
    async fn configure(&mut self, identity: &Identity) -> Result<(), ScrapeError>;

    /// Load `url` and wait for network idle, failing with
    /// [`ScrapeError::Timeout`] once `deadline` elapses.
    async fn navigate(
        &mut self,
        url: &Url,
        deadline: Duration,
    ) -> Result<NavigationOutcome, ScrapeError>;

    /// Apply the extraction schema to the current DOM.
    async fn extract(&mut self) -> Result<ExtractionResult, ScrapeError>;

    /// Release the browser process and everything attached to it.
    async fn close(&mut self) -> Result<(), ScrapeError>;
}
