//! pagescout - single-page scraping over a headless browser.
//!
//! Renders a URL in an isolated headless Chrome session, waits for the
//! network to settle and returns the page title, meta description, first
//! `<h1>` and HTTP status. Exposed as an HTTP API and a CLI.

pub mod cli;
pub mod config;
pub mod scrapers;
pub mod server;
