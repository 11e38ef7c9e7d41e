//! Per-origin politeness delays
//!
//! Every request the crawler issues passes through [`DomainRateLimiter::throttle`]
//! first. Requests to the same `scheme://host[:port]` are spaced at least the
//! configured delay apart; different origins never wait on each other.

use crate::state::DomainState;
use crate::url::NormalizedUrl;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Upper bound on a robots.txt `Crawl-delay` the crawler will honor
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Enforces minimum spacing between requests to the same origin
#[derive(Debug)]
pub struct DomainRateLimiter {
    min_delay: Duration,
    domains: HashMap<String, DomainState>,
}

impl DomainRateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            domains: HashMap::new(),
        }
    }

    /// The configured delay applied to every origin
    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Waits until a request to `url`'s origin is allowed, then records it
    ///
    /// The request is recorded whether or not the caller's fetch later
    /// succeeds.
    pub async fn throttle(&mut self, url: &NormalizedUrl) {
        let origin = url.origin();

        let wait = self
            .domains
            .get(&origin)
            .and_then(|state| state.time_until_next_request(self.min_delay, Instant::now()));

        if let Some(wait) = wait {
            tracing::debug!("Waiting {:?} before next request to {}", wait, origin);
            tokio::time::sleep(wait).await;
        }

        self.domains
            .entry(origin)
            .or_default()
            .record_request(Instant::now());
    }

    /// Records a robots.txt crawl delay for an origin, capped at [`MAX_CRAWL_DELAY`]
    pub fn set_crawl_delay(&mut self, origin: &str, delay: Duration) {
        let capped = delay.min(MAX_CRAWL_DELAY);
        if capped < delay {
            tracing::warn!(
                "Crawl-delay of {:?} for {} exceeds the cap, using {:?}",
                delay,
                origin,
                capped
            );
        }
        self.domains.entry(origin.to_string()).or_default().crawl_delay = Some(capped);
    }

    /// State for an origin, if any request or crawl delay has been recorded
    pub fn state(&self, origin: &str) -> Option<&DomainState> {
        self.domains.get(origin)
    }

    /// Number of requests recorded for an origin
    pub fn request_count(&self, origin: &str) -> u32 {
        self.domains.get(origin).map_or(0, |s| s.request_count)
    }
}
