//! Shared helper functions for CLI commands.

use std::sync::Arc;

use crate::config::Config;
use crate::scrapers::{ChromeRenderer, Scraper};

/// Build a Chrome-backed scraper from configuration.
pub fn build_scraper(config: &Config) -> anyhow::Result<Scraper> {
    let renderer = ChromeRenderer::new(config.browser.clone());
    Ok(Scraper::new(Arc::new(renderer))
        .with_identities(config.identity_pool()?)
        .with_max_retries(config.max_retries))
}
