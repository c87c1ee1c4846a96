//! Retry/extraction orchestration over renderer sessions.
//!
//! Each attempt owns exactly one renderer session: open, configure with a
//! freshly chosen identity, navigate, extract, close. Only navigation
//! timeouts are retried; every other failure is terminal.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use url::Url;

use super::error::ScrapeError;
use super::identity::IdentityPool;
use super::renderer::{Renderer, RendererSession};
use super::types::{FetchRequest, Identity, ScrapeResult};

/// Deadline for the navigate-to-idle window of one attempt.
pub const NAVIGATION_DEADLINE: Duration = Duration::from_secs(20);

/// Retries granted after a timed-out first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Drives renderer sessions through the bounded retry loop.
///
/// Holds no per-request state, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct Scraper {
    renderer: Arc<dyn Renderer>,
    identities: IdentityPool,
    max_retries: u32,
}

impl Scraper {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            identities: IdentityPool::default(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_identities(mut self, identities: IdentityPool) -> Self {
        self.identities = identities;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Scrape `request`, making at most `max_retries + 1` attempts.
    pub async fn scrape(&self, request: &FetchRequest) -> Result<ScrapeResult, ScrapeError> {
        let mut rng = StdRng::from_entropy();
        self.scrape_with_rng(request, &mut rng).await
    }

    /// Like [`Scraper::scrape`] with a caller-supplied identity RNG.
    pub async fn scrape_with_rng<R>(
        &self,
        request: &FetchRequest,
        rng: &mut R,
    ) -> Result<ScrapeResult, ScrapeError>
    where
        R: Rng + Send + ?Sized,
    {
        let mut attempt: u32 = 0;

        loop {
            let identity = self.identities.choose(rng);
            let started = Instant::now();
            debug!(
                "Attempt {} for {} as {:?}",
                attempt + 1,
                request,
                identity.user_agent
            );

            match self.attempt(request.url(), &identity).await {
                Ok(result) => {
                    info!(
                        "Scraped {} (status {}) on attempt {} in {:.1}s",
                        request,
                        result.status,
                        attempt + 1,
                        started.elapsed().as_secs_f32()
                    );
                    return Ok(result);
                }
                Err(err) if err.is_timeout() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!("Timeout on attempt {} for {}, retrying", attempt, request);
                }
                Err(err) => {
                    warn!(
                        "Scrape of {} failed on attempt {}: {}",
                        request,
                        attempt + 1,
                        err
                    );
                    return Err(err);
                }
            }
        }
    }

    /// One attempt. The session is closed on every exit path, panics included.
    async fn attempt(&self, url: &Url, identity: &Identity) -> Result<ScrapeResult, ScrapeError> {
        let mut session = self.renderer.open().await?;

        let outcome = AssertUnwindSafe(run_session(session.as_mut(), url, identity))
            .catch_unwind()
            .await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

async fn run_session(
    session: &mut dyn RendererSession,
    url: &Url,
    identity: &Identity,
) -> Result<ScrapeResult, ScrapeError> {
    session.configure(identity).await?;
    let navigation = session.navigate(url, NAVIGATION_DEADLINE).await?;
    let extraction = session.extract().await?;
    Ok(ScrapeResult::new(extraction, navigation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::error::AttemptFailure;
    use crate::scrapers::testing::{ScriptedRenderer, Step};
    use crate::scrapers::types::ExtractionResult;

    fn scraper_for(renderer: &ScriptedRenderer) -> Scraper {
        Scraper::new(Arc::new(renderer.clone()))
    }

    fn request() -> FetchRequest {
        FetchRequest::parse("https://example.com").unwrap()
    }

    async fn run(scraper: &Scraper) -> Result<ScrapeResult, ScrapeError> {
        let mut rng = StdRng::seed_from_u64(3);
        scraper.scrape_with_rng(&request(), &mut rng).await
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let renderer = ScriptedRenderer::new([Step::Succeeds {
            status: 200,
            extraction: ExtractionResult {
                title: "Example Domain".to_string(),
                meta_description: "desc".to_string(),
                h1: "Heading".to_string(),
            },
        }]);

        let result = run(&scraper_for(&renderer)).await.unwrap();

        assert_eq!(result.title, "Example Domain");
        assert_eq!(result.meta_description, "desc");
        assert_eq!(result.h1, "Heading");
        assert_eq!(result.status, 200);
        assert_eq!(renderer.opens(), 1);
        assert_eq!(renderer.closes(), renderer.launched());
    }

    #[tokio::test]
    async fn test_status_passed_through() {
        let renderer = ScriptedRenderer::new([Step::ok(404, "Not Found")]);

        let result = run(&scraper_for(&renderer)).await.unwrap();

        assert_eq!(result.status, 404);
        assert_eq!(result.title, "Not Found");
    }

    #[tokio::test]
    async fn test_timeout_then_success_returns_retry_result() {
        let renderer = ScriptedRenderer::new([Step::Timeout, Step::ok(200, "Second try")]);

        let result = run(&scraper_for(&renderer)).await.unwrap();

        assert_eq!(result.title, "Second try");
        assert_eq!(renderer.opens(), 2);
        assert_eq!(renderer.closes(), 2);
    }

    #[tokio::test]
    async fn test_timeout_on_every_attempt() {
        let renderer = ScriptedRenderer::new([Step::Timeout, Step::Timeout]);

        let err = run(&scraper_for(&renderer)).await.unwrap_err();

        assert_eq!(err.failure(), AttemptFailure::Timeout);
        assert_eq!(renderer.opens(), 2);
        assert_eq!(renderer.closes(), 2);
    }

    #[tokio::test]
    async fn test_attempts_bounded_by_max_retries() {
        let renderer = ScriptedRenderer::new(std::iter::repeat(Step::Timeout).take(4));
        let scraper = scraper_for(&renderer).with_max_retries(3);

        let err = run(&scraper).await.unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(renderer.opens(), 4);
        assert_eq!(renderer.closes(), 4);
    }

    #[tokio::test]
    async fn test_zero_retries_makes_single_attempt() {
        let renderer = ScriptedRenderer::new([Step::Timeout]);
        let scraper = scraper_for(&renderer).with_max_retries(0);

        assert!(run(&scraper).await.unwrap_err().is_timeout());
        assert_eq!(renderer.opens(), 1);
    }

    #[tokio::test]
    async fn test_launch_error_not_retried() {
        let renderer = ScriptedRenderer::new([Step::LaunchFails, Step::ok(200, "unused")]);

        let err = run(&scraper_for(&renderer)).await.unwrap_err();

        assert!(matches!(err, ScrapeError::Launch(_)));
        assert_eq!(renderer.opens(), 1);
        assert_eq!(renderer.launched(), 0);
        assert_eq!(renderer.closes(), 0);
    }

    #[tokio::test]
    async fn test_navigation_error_not_retried() {
        let renderer = ScriptedRenderer::new([Step::NavigationFails, Step::ok(200, "unused")]);

        let err = run(&scraper_for(&renderer)).await.unwrap_err();

        assert!(matches!(err, ScrapeError::Navigation(_)));
        assert_eq!(err.failure(), AttemptFailure::Other);
        assert_eq!(renderer.opens(), 1);
        assert_eq!(renderer.closes(), 1);
    }

    #[tokio::test]
    async fn test_configure_and_extraction_errors_close_session() {
        for step in [Step::ConfigureFails, Step::ExtractionFails] {
            let renderer = ScriptedRenderer::new([step.clone(), Step::ok(200, "unused")]);

            let err = run(&scraper_for(&renderer)).await.unwrap_err();

            assert_eq!(err.failure(), AttemptFailure::Other, "{step:?}");
            assert_eq!(renderer.opens(), 1, "{step:?}");
            assert_eq!(renderer.closes(), 1, "{step:?}");
        }
    }

    #[tokio::test]
    async fn test_configure_failure_skips_navigation() {
        let renderer = ScriptedRenderer::new([Step::ConfigureFails]);

        let _ = run(&scraper_for(&renderer)).await;

        assert_eq!(renderer.navigations(), 0);
    }

    #[tokio::test]
    async fn test_timeout_then_navigation_error_stops() {
        let renderer = ScriptedRenderer::new([
            Step::Timeout,
            Step::NavigationFails,
            Step::ok(200, "unused"),
        ]);
        let scraper = scraper_for(&renderer).with_max_retries(5);

        let err = run(&scraper).await.unwrap_err();

        assert!(matches!(err, ScrapeError::Navigation(_)));
        assert_eq!(renderer.opens(), 2);
        assert_eq!(renderer.closes(), 2);
    }

    #[tokio::test]
    async fn test_panic_inside_attempt_still_closes_session() {
        let renderer = ScriptedRenderer::new([Step::PanicsDuringNavigate]);
        let scraper = scraper_for(&renderer);

        let joined = tokio::spawn(async move { run(&scraper).await }).await;

        assert!(joined.unwrap_err().is_panic());
        assert_eq!(renderer.launched(), 1);
        assert_eq!(renderer.closes(), 1);
    }

    #[tokio::test]
    async fn test_every_attempt_uses_fixed_deadline() {
        let renderer = ScriptedRenderer::new([Step::Timeout, Step::Timeout]);

        let _ = run(&scraper_for(&renderer)).await;

        assert_eq!(
            renderer.deadlines(),
            vec![NAVIGATION_DEADLINE, NAVIGATION_DEADLINE]
        );
    }

    #[tokio::test]
    async fn test_identity_chosen_per_attempt_from_pool() {
        let renderer = ScriptedRenderer::new([Step::Timeout, Step::ok(200, "ok")]);
        let pool = IdentityPool::new(["agent-a", "agent-b"]).unwrap();
        let scraper = scraper_for(&renderer).with_identities(pool.clone());

        run(&scraper).await.unwrap();

        let identities = renderer.identities();
        assert_eq!(identities.len(), 2);
        for identity in identities {
            assert!(pool.user_agents().contains(&identity.user_agent));
            assert_eq!(identity.viewport, pool.viewport());
        }
    }

    async fn identities_for_seed(pool: &IdentityPool, seed: u64) -> Vec<Identity> {
        let renderer = ScriptedRenderer::new([Step::Timeout, Step::Timeout]);
        let scraper = scraper_for(&renderer).with_identities(pool.clone());
        let mut rng = StdRng::seed_from_u64(seed);
        let _ = scraper.scrape_with_rng(&request(), &mut rng).await;
        renderer.identities()
    }

    #[tokio::test]
    async fn test_seeded_rng_reproduces_identities() {
        let pool = IdentityPool::new(["a", "b", "c", "d"]).unwrap();

        let first = identities_for_seed(&pool, 9).await;
        let second = identities_for_seed(&pool, 9).await;

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }
}
