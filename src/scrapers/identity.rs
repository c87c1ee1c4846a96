//! User agent pool and per-attempt identity selection.

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{Identity, Viewport};

/// Desktop Chrome user agents rotated across attempts.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Fixed, non-empty pool of identities.
#[derive(Debug, Clone)]
pub struct IdentityPool {
    user_agents: Vec<String>,
    viewport: Viewport,
}

impl IdentityPool {
    /// Build a pool from user agent strings. Blank entries are dropped;
    /// returns `None` when nothing usable is left.
    pub fn new<I, S>(user_agents: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let user_agents: Vec<String> = user_agents
            .into_iter()
            .map(Into::into)
            .filter(|ua| !ua.trim().is_empty())
            .collect();

        if user_agents.is_empty() {
            return None;
        }

        Some(Self {
            user_agents,
            viewport: Viewport::DESKTOP,
        })
    }

    pub fn user_agents(&self) -> &[String] {
        &self.user_agents
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pick an identity uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Identity {
        // Non-empty by construction.
        let user_agent = self
            .user_agents
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_USER_AGENTS[0].to_string());

        Identity {
            user_agent,
            viewport: self.viewport,
        }
    }
}

impl Default for IdentityPool {
    fn default() -> Self {
        Self {
            user_agents: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            viewport: Viewport::DESKTOP,
        }
    }
}
