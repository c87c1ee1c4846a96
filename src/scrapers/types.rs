//! Value types passed between the renderer, the orchestrator and the API.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use super::error::InvalidUrl;

/// Browser viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Desktop viewport presented to every target site.
    pub const DESKTOP: Viewport = Viewport {
        width: 1920,
        height: 1080,
    };
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DESKTOP
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// User agent and viewport presented to the target site for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_agent: String,
    pub viewport: Viewport,
}

/// A scrape request for a URL that already passed syntax validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    url: Url,
}

impl FetchRequest {
    /// Validate `input` as an absolute `http`/`https` URL.
    pub fn parse(input: &str) -> Result<Self, InvalidUrl> {
        let url = Url::parse(input).map_err(|_| InvalidUrl::new(input))?;
        match url.scheme() {
            "http" | "https" => Ok(Self { url }),
            _ => Err(InvalidUrl::new(input)),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.url.fmt(f)
    }
}

/// Result of a completed navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// Status code of the final main-document response (after redirects).
    pub http_status: u16,
}

/// Fields pulled out of the rendered DOM. Missing nodes yield empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub title: String,
    pub meta_description: String,
    pub h1: String,
}

/// Successful scrape: extraction fields plus the navigation status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub title: String,
    pub meta_description: String,
    pub h1: String,
    pub status: u16,
}

impl ScrapeResult {
    pub fn new(extraction: ExtractionResult, navigation: NavigationOutcome) -> Self {
        Self {
            title: extraction.title,
            meta_description: extraction.meta_description,
            h1: extraction.h1,
            status: navigation.http_status,
        }
    }
}
