//! Robots.txt permission gate
//!
//! The gate owns the per-origin cache for one crawl run and performs at most
//! one robots.txt request per origin.

use crate::robots::{fetch_robots, RobotsCache, RobotsEntry};
use crate::url::NormalizedUrl;
use reqwest::Client;
use std::time::Duration;

/// Larger robots.txt delays are reported as this many seconds
const MAX_REPORTED_DELAY_SECS: f64 = 86_400.0;

/// Decides whether URLs may be fetched according to robots.txt
pub struct RobotsGate {
    client: Client,
    user_agent: String,
    enabled: bool,
    timeout: Duration,
    cache: RobotsCache,
}

impl RobotsGate {
    /// Creates a new gate
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for robots.txt requests
    /// * `user_agent` - Product token matched against `User-agent` lines
    /// * `enabled` - When false every URL is allowed and nothing is fetched
    /// * `timeout` - Bound on each robots.txt request
    pub fn new(
        client: Client,
        user_agent: impl Into<String>,
        enabled: bool,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
            enabled,
            timeout,
            cache: RobotsCache::new(),
        }
    }

    /// Checks whether a URL may be fetched
    ///
    /// The first call for an origin fetches its robots.txt; later calls use
    /// the cached answer. Fails open.
    pub async fn can_fetch(&mut self, url: &NormalizedUrl) -> bool {
        if !self.enabled {
            return true;
        }

        let origin = url.origin();
        self.ensure_cached(&origin).await;

        let allowed = self
            .cache
            .get(&origin)
            .map_or(true, |entry| entry.is_allowed(url.as_str(), &self.user_agent));

        if !allowed {
            tracing::info!("Blocked by robots.txt: {}", url);
        }

        allowed
    }

    /// Returns the robots.txt Crawl-delay for the URL's origin, if cached
    ///
    /// Never triggers a fetch.
    pub fn crawl_delay(&self, url: &NormalizedUrl) -> Option<Duration> {
        if !self.enabled {
            return None;
        }

        self.cache
            .get(&url.origin())
            .and_then(|entry| entry.crawl_delay(&self.user_agent))
            .map(|secs| Duration::from_secs_f64(secs.min(MAX_REPORTED_DELAY_SECS)))
    }

    /// Returns the cached entry for an origin, if any
    pub fn cached(&self, origin: &str) -> Option<&RobotsEntry> {
        self.cache.get(origin)
    }

    /// Number of origins whose robots.txt has been resolved
    pub fn cached_origins(&self) -> usize {
        self.cache.len()
    }

    async fn ensure_cached(&mut self, origin: &str) {
        if self.cache.contains(origin) {
            return;
        }

        tracing::info!("Fetching robots.txt for {}", origin);
        let entry = match fetch_robots(&self.client, origin, self.timeout).await {
            Ok(robots) => {
                tracing::info!("Loaded robots.txt for {}", origin);
                RobotsEntry::Rules(robots)
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read robots.txt for {}: {}. Allowing crawl.",
                    origin,
                    e
                );
                RobotsEntry::Unavailable
            }
        };
        self.cache.insert(origin.to_string(), entry);
    }
}
