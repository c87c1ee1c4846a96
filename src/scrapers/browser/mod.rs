//! Chrome-backed renderer.
//!
//! Uses chromiumoxide (CDP) to launch one isolated headless Chrome process
//! per session. Each session gets its own temporary profile directory so
//! concurrent sessions never share cookies, cache or storage.

mod config;
pub mod network_idle;
#[cfg(feature = "browser")]
mod session;

pub use config::{BrowserSettings, LAUNCH_ARGS};
pub use network_idle::{NetworkIdlePolicy, NetworkIdleTracker};

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use super::error::ScrapeError;
use super::renderer::{Renderer, RendererSession};

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Common install locations
    "/opt/google/chrome/google-chrome",
];

/// Executable names looked up on `PATH`.
const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Locate a Chrome executable: explicit path first, then well-known install
/// locations, then `PATH`.
pub fn find_chrome(explicit: Option<&Path>) -> Result<PathBuf, ScrapeError> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ScrapeError::Launch(format!(
            "Configured Chrome executable not found: {}",
            path.display()
        )));
    }

    for path in CHROME_PATHS {
        let p = Path::new(path);
        if p.exists() {
            debug!("Found Chrome at: {}", path);
            return Ok(p.to_path_buf());
        }
    }

    for cmd in CHROME_COMMANDS {
        if let Ok(path) = which::which(cmd) {
            debug!("Found Chrome in PATH: {}", path.display());
            return Ok(path);
        }
    }

    Err(ScrapeError::Launch(
        "Chrome/Chromium not found. Please install it:\n\
         - Arch/Manjaro: sudo pacman -S chromium\n\
         - Ubuntu/Debian: sudo apt install chromium-browser\n\
         - Fedora: sudo dnf install chromium\n\
         - Or set CHROME_PATH / [browser].executable"
            .to_string(),
    ))
}

/// Launches a fresh Chrome process for every session.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    settings: BrowserSettings,
}

impl ChromeRenderer {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl Renderer for ChromeRenderer {
    async fn open(&self) -> Result<Box<dyn RendererSession>, ScrapeError> {
        let executable = find_chrome(self.settings.executable.as_deref())?;
        info!(
            "Launching browser {} (headless={})",
            executable.display(),
            self.settings.headless
        );
        let session = session::ChromeSession::launch(&executable, &self.settings).await?;
        Ok(Box::new(session))
    }
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
#[async_trait]
impl Renderer for ChromeRenderer {
    async fn open(&self) -> Result<Box<dyn RendererSession>, ScrapeError> {
        Err(ScrapeError::Launch(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
                .to_string(),
        ))
    }
}
