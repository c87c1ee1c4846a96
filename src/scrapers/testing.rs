//! Scripted renderer for exercising the orchestrator and API without Chrome.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::error::ScrapeError;
use super::renderer::{Renderer, RendererSession};
use super::types::{ExtractionResult, Identity, NavigationOutcome};

/// What a single attempt does.
#[derive(Debug, Clone)]
pub enum Step {
    LaunchFails,
    ConfigureFails,
    NavigationFails,
    Timeout,
    ExtractionFails,
    PanicsDuringNavigate,
    Succeeds {
        status: u16,
        extraction: ExtractionResult,
    },
}

impl Step {
    pub fn ok(status: u16, title: &str) -> Self {
        Step::Succeeds {
            status,
            extraction: ExtractionResult {
                title: title.to_string(),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    launched: AtomicUsize,
    closes: AtomicUsize,
    navigations: AtomicUsize,
    identities: Mutex<Vec<Identity>>,
    deadlines: Mutex<Vec<Duration>>,
}

/// Renderer that plays back one [`Step`] per `open()` call.
#[derive(Debug, Clone)]
pub struct ScriptedRenderer {
    steps: Arc<Mutex<VecDeque<Step>>>,
    counters: Arc<Counters>,
}

impl ScriptedRenderer {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into_iter().collect())),
            counters: Arc::new(Counters::default()),
        }
    }

    /// A renderer that must never be opened.
    pub fn empty() -> Self {
        Self::new(Vec::<Step>::new())
    }

    /// Sessions opened, including failed launches.
    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    /// Sessions that were successfully launched.
    pub fn launched(&self) -> usize {
        self.counters.launched.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> usize {
        self.counters.navigations.load(Ordering::SeqCst)
    }

    pub fn identities(&self) -> Vec<Identity> {
        self.counters.identities.lock().unwrap().clone()
    }

    pub fn deadlines(&self) -> Vec<Duration> {
        self.counters.deadlines.lock().unwrap().clone()
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn open(&self) -> Result<Box<dyn RendererSession>, ScrapeError> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("renderer opened more times than scripted");

        if let Step::LaunchFails = step {
            return Err(ScrapeError::Launch("chrome exited during startup".into()));
        }
        self.counters.launched.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(ScriptedSession {
            step,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct ScriptedSession {
    step: Step,
    counters: Arc<Counters>,
}

#[async_trait]
impl RendererSession for ScriptedSession {
    async fn configure(&mut self, identity: &Identity) -> Result<(), ScrapeError> {
        self.counters
            .identities
            .lock()
            .unwrap()
            .push(identity.clone());
        match self.step {
            Step::ConfigureFails => Err(ScrapeError::Session("target crashed".into())),
            _ => Ok(()),
        }
    }

    async fn navigate(
        &mut self,
        url: &Url,
        deadline: Duration,
    ) -> Result<NavigationOutcome, ScrapeError> {
        self.counters.navigations.fetch_add(1, Ordering::SeqCst);
        self.counters.deadlines.lock().unwrap().push(deadline);
        match &self.step {
            Step::NavigationFails => Err(ScrapeError::Navigation(format!(
                "net::ERR_NAME_NOT_RESOLVED at {url}"
            ))),
            Step::Timeout => Err(ScrapeError::Timeout(deadline)),
            Step::PanicsDuringNavigate => panic!("renderer blew up"),
            Step::Succeeds { status, .. } => Ok(NavigationOutcome {
                http_status: *status,
            }),
            _ => Ok(NavigationOutcome { http_status: 200 }),
        }
    }

    async fn extract(&mut self) -> Result<ExtractionResult, ScrapeError> {
        match &self.step {
            Step::ExtractionFails => Err(ScrapeError::Extraction("page crashed".into())),
            Step::Succeeds { extraction, .. } => Ok(extraction.clone()),
            _ => Ok(ExtractionResult::default()),
        }
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
