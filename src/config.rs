//! Configuration management for pagescout using the prefer crate.
//!
//! Every setting is optional. Without a config file the service runs with the
//! built-in identity pool, one retry and an auto-discovered Chrome.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::scrapers::identity::{IdentityPool, DEFAULT_USER_AGENTS};
use crate::scrapers::orchestrator::DEFAULT_MAX_RETRIES;
use crate::scrapers::BrowserSettings;

/// Environment variable naming the Chrome executable.
pub const CHROME_PATH_ENV: &str = "CHROME_PATH";

fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// User agents one is picked from per attempt.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,

    /// Retries granted after a navigation timeout.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Browser launch settings.
    #[serde(default)]
    pub browser: BrowserSettings,

    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agents: default_user_agents(),
            max_retries: default_max_retries(),
            browser: BrowserSettings::default(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration using prefer for discovery.
    ///
    /// A discovered file that fails to parse is reported and ignored.
    pub async fn load() -> Self {
        let config = match prefer::load("pagescout").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        warn!("Ignoring config file {}: {:#}", path.display(), e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Load an explicitly requested config file. Errors are fatal.
    pub async fn load_explicit(path: &Path) -> anyhow::Result<Self> {
        let config = Self::load_from_path(path).await?;
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> anyhow::Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let config: Config = match ext {
            "toml" => toml::from_str(contents).context("Failed to parse TOML config")?,
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).context("Failed to parse YAML config")?
            }
            _ => serde_json::from_str(contents).context("Failed to parse JSON config")?,
        };
        Ok(config)
    }

    /// Apply environment overrides. `CHROME_PATH` wins over the file.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(CHROME_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            self.browser.executable = Some(PathBuf::from(path));
        }
        self
    }

    /// Identity pool built from `user_agents`.
    pub fn identity_pool(&self) -> anyhow::Result<IdentityPool> {
        match IdentityPool::new(&self.user_agents) {
            Some(pool) => Ok(pool),
            None => bail!("user_agents must contain at least one non-empty entry"),
        }
    }
}
