//! A single Chrome process plus one page, driven over CDP.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    self, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent, EventResponseReceived,
    ResourceType, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    EventDomContentEventFired, FrameId, NavigateParams,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use super::config::BrowserSettings;
use super::network_idle::{NetworkIdlePolicy, NetworkIdleTracker};
use crate::scrapers::error::ScrapeError;
use crate::scrapers::extract::extract_page_summary;
use crate::scrapers::renderer::RendererSession;
use crate::scrapers::types::{ExtractionResult, Identity, NavigationOutcome};

/// Page activity relevant to idle detection and status capture.
enum NetworkEvent {
    Started(String),
    Settled(String),
    DocumentLoaded,
    Document {
        frame_id: Option<FrameId>,
        status: i64,
    },
}

pub(super) struct ChromeSession {
    browser: Option<Browser>,
    page: Option<Page>,
    handler: JoinHandle<()>,
    idle_policy: NetworkIdlePolicy,
    // Removed when dropped, after the browser has exited.
    _profile: TempDir,
}

impl ChromeSession {
    /// Launch Chrome with a throwaway profile and open a blank page.
    pub(super) async fn launch(
        executable: &Path,
        settings: &BrowserSettings,
    ) -> Result<Self, ScrapeError> {
        let profile = tempfile::Builder::new()
            .prefix("pagescout-profile-")
            .tempdir()
            .map_err(|e| ScrapeError::Launch(format!("Failed to create profile dir: {}", e)))?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(executable)
            .user_data_dir(profile.path());

        // Set headless mode (with_head means NOT headless, confusingly)
        if !settings.headless {
            builder = builder.with_head();
        }
        for arg in settings.launch_args() {
            builder = builder.arg(arg);
        }

        let config = builder
            .build()
            .map_err(|e| ScrapeError::Launch(format!("Failed to build browser config: {}", e)))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        // Spawn handler task
        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.kill().await;
                handler.abort();
                return Err(ScrapeError::Launch(format!("Failed to open page: {}", e)));
            }
        };

        debug!("Browser session ready (profile {})", profile.path().display());

        Ok(Self {
            browser: Some(browser),
            page: Some(page),
            handler,
            idle_policy: NetworkIdlePolicy::default(),
            _profile: profile,
        })
    }

    fn page(&self) -> Result<&Page, ScrapeError> {
        self.page
            .as_ref()
            .ok_or_else(|| ScrapeError::Session("session already closed".to_string()))
    }

    /// Subscribe to network and load events. Must happen before navigation
    /// starts.
    async fn network_events(page: &Page) -> Result<BoxStream<'static, NetworkEvent>, ScrapeError> {
        let started = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(session_error)?
            .map(|e| NetworkEvent::Started(e.request_id.inner().clone()));
        let finished = page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(session_error)?
            .map(|e| NetworkEvent::Settled(e.request_id.inner().clone()));
        let failed = page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(session_error)?
            .map(|e| NetworkEvent::Settled(e.request_id.inner().clone()));
        let responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(session_error)?
            .filter_map(|e| async move {
                (e.r#type == ResourceType::Document).then(|| NetworkEvent::Document {
                    frame_id: e.frame_id.clone(),
                    status: e.response.status,
                })
            });
        let loaded = page
            .event_listener::<EventDomContentEventFired>()
            .await
            .map_err(session_error)?
            .map(|_| NetworkEvent::DocumentLoaded);

        Ok(stream::select_all([
            started.boxed(),
            finished.boxed(),
            failed.boxed(),
            responses.boxed(),
            loaded.boxed(),
        ])
        .boxed())
    }

    async fn navigate_until_idle(&self, url: &Url) -> Result<NavigationOutcome, ScrapeError> {
        let page = self.page()?;

        page.execute(network::EnableParams::default())
            .await
            .map_err(session_error)?;
        let mut events = Self::network_events(page).await?;
        let mut tracker = NetworkIdleTracker::new(self.idle_policy, Instant::now());

        debug!("Navigating to {}", url);
        let params = NavigateParams::builder()
            .url(url.as_str())
            .build()
            .map_err(ScrapeError::Navigation)?;
        let navigated = page
            .execute(params)
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;
        if let Some(error_text) = navigated.result.error_text.as_deref() {
            if !error_text.is_empty() {
                return Err(ScrapeError::Navigation(format!("{} at {}", error_text, url)));
            }
        }
        let main_frame = navigated.result.frame_id.clone();

        let mut status: Option<i64> = None;
        loop {
            // Idle only counts once the main document has answered and parsed.
            let idle_at = status.and(tracker.idle_at());
            tokio::select! {
                event = events.next() => match event {
                    Some(NetworkEvent::Started(id)) => tracker.request_started(id, Instant::now()),
                    Some(NetworkEvent::Settled(id)) => tracker.request_settled(&id, Instant::now()),
                    Some(NetworkEvent::DocumentLoaded) => tracker.document_loaded(Instant::now()),
                    Some(NetworkEvent::Document { frame_id, status: code }) => {
                        if frame_id.as_ref() == Some(&main_frame) {
                            status = Some(code);
                        }
                    }
                    None => {
                        return Err(ScrapeError::Session(
                            "browser event stream closed during navigation".to_string(),
                        ))
                    }
                },
                _ = sleep_until(idle_at) => {
                    if tracker.is_idle(Instant::now()) {
                        break;
                    }
                }
            }
        }

        let http_status = status
            .and_then(|code| u16::try_from(code).ok())
            .ok_or_else(|| {
                ScrapeError::Navigation(format!("No document response received for {}", url))
            })?;
        debug!(
            "Network idle for {} (status {}, {} in flight)",
            url,
            http_status,
            tracker.inflight()
        );

        Ok(NavigationOutcome { http_status })
    }
}

async fn sleep_until(at: Option<Instant>) {
    match at {
        Some(at) => tokio::time::sleep_until(at.into()).await,
        None => std::future::pending().await,
    }
}

fn session_error(e: chromiumoxide::error::CdpError) -> ScrapeError {
    ScrapeError::Session(e.to_string())
}

#[async_trait]
impl RendererSession for ChromeSession {
    async fn configure(&mut self, identity: &Identity) -> Result<(), ScrapeError> {
        let page = self.page()?;

        page.execute(SetUserAgentOverrideParams::new(identity.user_agent.clone()))
            .await
            .map_err(session_error)?;

        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(identity.viewport.width))
            .height(i64::from(identity.viewport.height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(ScrapeError::Session)?;
        page.execute(metrics).await.map_err(session_error)?;

        debug!(
            "Configured session: {} @ {}",
            identity.user_agent, identity.viewport
        );
        Ok(())
    }

    async fn navigate(
        &mut self,
        url: &Url,
        deadline: Duration,
    ) -> Result<NavigationOutcome, ScrapeError> {
        match tokio::time::timeout(deadline, self.navigate_until_idle(url)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ScrapeError::Timeout(deadline)),
        }
    }

    async fn extract(&mut self) -> Result<ExtractionResult, ScrapeError> {
        let html = self
            .page()?
            .content()
            .await
            .map_err(|e| ScrapeError::Extraction(e.to_string()))?;
        extract_page_summary(&html)
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        self.page = None;
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };

        let mut result = Ok(());
        if let Err(e) = browser.close().await {
            warn!("Graceful browser close failed, killing process: {}", e);
            if let Some(Err(kill_err)) = browser.kill().await {
                result = Err(ScrapeError::Session(format!(
                    "Failed to kill browser: {}",
                    kill_err
                )));
            }
        }
        if let Err(e) = browser.wait().await {
            debug!("Failed to reap browser process: {}", e);
        }

        self.handler.abort();
        result
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
