//! Network-idle predicate used to decide when a navigation has settled.
//!
//! The page counts as idle once its document has loaded and the number of
//! in-flight requests has then stayed at or below `max_inflight` continuously
//! for `quiet_window`. Time before the document loaded never counts toward the
//! window. The tracker is fed events with explicit timestamps so it can be
//! driven without a browser.

use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Thresholds for the idle predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkIdlePolicy {
    pub max_inflight: usize,
    pub quiet_window: Duration,
}

impl Default for NetworkIdlePolicy {
    fn default() -> Self {
        Self {
            max_inflight: 2,
            quiet_window: Duration::from_millis(500),
        }
    }
}

/// Tracks in-flight requests and when the page last became calm.
#[derive(Debug)]
pub struct NetworkIdleTracker {
    policy: NetworkIdlePolicy,
    inflight: HashSet<String>,
    calm_since: Option<Instant>,
    loaded_at: Option<Instant>,
}

impl NetworkIdleTracker {
    /// Start tracking at `now` with no requests in flight and no document
    /// loaded yet.
    pub fn new(policy: NetworkIdlePolicy, now: Instant) -> Self {
        Self {
            policy,
            inflight: HashSet::new(),
            calm_since: Some(now),
            loaded_at: None,
        }
    }

    pub fn inflight(&self) -> usize {
        self.inflight.len()
    }

    /// A request started. Redirect hops reuse the request id and are no-ops.
    pub fn request_started(&mut self, request_id: impl Into<String>, now: Instant) {
        self.inflight.insert(request_id.into());
        self.update(now);
    }

    /// A request finished or failed.
    pub fn request_settled(&mut self, request_id: &str, now: Instant) {
        self.inflight.remove(request_id);
        self.update(now);
    }

    /// The main document finished parsing (`DOMContentLoaded`). The quiet
    /// window starts no earlier than the latest such event.
    pub fn document_loaded(&mut self, now: Instant) {
        self.loaded_at = Some(now);
    }

    fn update(&mut self, now: Instant) {
        if self.inflight.len() > self.policy.max_inflight {
            self.calm_since = None;
        } else if self.calm_since.is_none() {
            self.calm_since = Some(now);
        }
    }

    /// Instant at which the page becomes idle if no further events arrive.
    /// `None` while the document is loading or the network is busy.
    pub fn idle_at(&self) -> Option<Instant> {
        let calm_since = self.calm_since?;
        let loaded_at = self.loaded_at?;
        Some(calm_since.max(loaded_at) + self.policy.quiet_window)
    }

    pub fn is_idle(&self, now: Instant) -> bool {
        self.idle_at().is_some_and(|at| now >= at)
    }
}
