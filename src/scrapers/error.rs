//! Scrape error taxonomy.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single scrape attempt (and, once terminal, of the whole scrape).
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser session error: {0}")]
    Session(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Navigation timeout of {} ms exceeded", .0.as_millis())]
    Timeout(Duration),

    #[error("Extraction failed: {0}")]
    Extraction(String),
}

/// Retry classification of an attempt failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Navigation did not settle before the deadline. Retried.
    Timeout,
    /// Anything else. Terminal.
    Other,
}

impl ScrapeError {
    pub fn failure(&self) -> AttemptFailure {
        match self {
            ScrapeError::Timeout(_) => AttemptFailure::Timeout,
            _ => AttemptFailure::Other,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.failure() == AttemptFailure::Timeout
    }
}

/// Input that is not an absolute `http`/`https` URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid URL: {input:?}")]
pub struct InvalidUrl {
    pub input: String,
}

impl InvalidUrl {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}
