//! Page scraping: renderer sessions, retry orchestration and extraction.

pub mod browser;
pub mod error;
pub mod extract;
pub mod identity;
pub mod orchestrator;
pub mod renderer;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::{BrowserSettings, ChromeRenderer};
pub use error::{AttemptFailure, InvalidUrl, ScrapeError};
pub use extract::extract_page_summary;
pub use identity::{IdentityPool, DEFAULT_USER_AGENTS};
pub use orchestrator::{Scraper, DEFAULT_MAX_RETRIES, NAVIGATION_DEADLINE};
pub use renderer::{Renderer, RendererSession};
pub use types::{ExtractionResult, FetchRequest, Identity, NavigationOutcome, ScrapeResult, Viewport};
