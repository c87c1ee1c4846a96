//! Browser launch configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Chrome launch flags applied to every session. Sandboxing is disabled; the
/// host is expected to provide process isolation.
pub const LAUNCH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--disable-gpu",
    "--no-first-run",
    "--no-default-browser-check",
];

/// Browser launch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Chrome/Chromium executable. Discovered automatically when unset.
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// Run in headless mode (default: true).
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

fn default_headless() -> bool {
    true
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable: None,
            headless: default_headless(),
            chrome_args: Vec::new(),
        }
    }
}

impl BrowserSettings {
    /// Full argument list passed to Chrome.
    pub fn launch_args(&self) -> Vec<String> {
        LAUNCH_ARGS
            .iter()
            .map(|arg| arg.to_string())
            .chain(self.chrome_args.iter().cloned())
            .collect()
    }
}
