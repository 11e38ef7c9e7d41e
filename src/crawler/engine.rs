//! Crawl engine - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop, which coordinates:
//! - Frontier and visited-set bookkeeping
//! - Robots.txt checks and per-origin throttling
//! - Fetching, persisting and link extraction
//! - Termination and statistics

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::parse_html;
use crate::crawler::rate_limiter::DomainRateLimiter;
use crate::output::CrawlStats;
use crate::robots::RobotsGate;
use crate::state::EntryState;
use crate::storage::{Document, DocumentStore};
use crate::url::{normalize_url, NormalizedUrl};
use chrono::Utc;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Owns all state for one crawl run
///
/// Nothing is shared between engines, so several can run side by side in one
/// process without interfering.
pub struct CrawlEngine {
    settings: CrawlerConfig,
    client: Client,
    robots: RobotsGate,
    rate_limiter: DomainRateLimiter,
    frontier: Frontier,
    store: Box<dyn DocumentStore>,
    /// Seed authorities when `same-domain-only` is on
    allowed_authorities: Option<HashSet<String>>,
    next_doc_id: u64,
    stats: CrawlStats,
    cancel: CancellationToken,
}

impl CrawlEngine {
    /// Creates a new engine seeded with `seeds` at depth 0
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seeds` - Seed URLs, in crawl order; malformed ones are dropped when popped
    /// * `store` - Where fetched documents are persisted
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Ready to run
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(
        config: &Config,
        seeds: Vec<String>,
        store: Box<dyn DocumentStore>,
    ) -> crate::Result<Self> {
        let settings = config.crawler.clone();
        let client = build_http_client(&config.user_agent, settings.request_timeout())?;

        let robots = RobotsGate::new(
            client.clone(),
            config.user_agent.robots_token(),
            settings.respect_robots,
            settings.robots_timeout(),
        );

        let allowed_authorities = settings.same_domain_only.then(|| {
            seeds
                .iter()
                .filter_map(|seed| normalize_url(seed).ok())
                .map(|url| url.authority())
                .collect::<HashSet<_>>()
        });

        if let Some(authorities) = &allowed_authorities {
            tracing::info!("Restricting crawl to {} seed host(s)", authorities.len());
        }

        let mut frontier = Frontier::new();
        for seed in seeds {
            frontier.push_seed(seed);
        }

        Ok(Self {
            rate_limiter: DomainRateLimiter::new(settings.delay()),
            settings,
            client,
            robots,
            frontier,
            store,
            allowed_authorities,
            next_doc_id: 0,
            stats: CrawlStats::default(),
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the engine's cancellation token
    ///
    /// Cancelling the token stops the crawl before the next entry is popped;
    /// a request already in flight is allowed to finish.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// A handle that cancels this engine's crawl
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Statistics collected so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Number of entries still queued
    pub fn queued(&self) -> usize {
        self.frontier.len()
    }

    /// Runs the crawl loop until the frontier is empty, the success budget
    /// is reached, or the crawl is cancelled
    ///
    /// Per-URL problems never abort the run; they are counted in the
    /// returned statistics.
    pub async fn run(&mut self) -> CrawlStats {
        tracing::info!(
            "Starting crawl: {} seed(s), max depth {}, max urls {}, delay {:?}",
            self.frontier.len(),
            self.settings.max_depth,
            self.settings.max_urls,
            self.rate_limiter.min_delay()
        );

        let start_time = Instant::now();

        loop {
            if self.stats.crawled >= self.settings.max_urls {
                tracing::info!("Reached max urls ({})", self.settings.max_urls);
                break;
            }

            if self.cancel.is_cancelled() {
                tracing::info!("Crawl cancelled, {} entries left in queue", self.frontier.len());
                break;
            }

            let Some(entry) = self.frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            let state = self.process_entry(entry).await;
            self.stats.record(state);
        }

        self.stats
            .finish(start_time.elapsed(), self.frontier.visited_count());

        tracing::info!(
            "Crawl finished: {} crawled, {} failed, {} blocked, {} visited in {:.2}s",
            self.stats.crawled,
            self.stats.failed,
            self.stats.blocked,
            self.stats.total_visited,
            self.stats.elapsed_time
        );

        self.stats.clone()
    }

    /// Takes one frontier entry through every gate and, if it passes, fetches it
    async fn process_entry(&mut self, entry: FrontierEntry) -> EntryState {
        if entry.depth > self.settings.max_depth {
            tracing::debug!("Skipping {} at depth {}: too deep", entry.url, entry.depth);
            return EntryState::DepthExceeded;
        }

        let url = match normalize_url(&entry.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping malformed URL {:?}: {}", entry.url, e);
                return EntryState::Malformed;
            }
        };

        if self.frontier.is_visited(&url) {
            tracing::debug!("Skipping {}: already visited", url);
            return EntryState::AlreadyVisited;
        }

        if let Some(allowed) = &self.allowed_authorities {
            if !allowed.contains(&url.authority()) {
                tracing::debug!("Skipping {}: outside seed hosts", url);
                return EntryState::DomainRestricted;
            }
        }

        self.frontier.mark_visited(&url);

        if !self.robots.can_fetch(&url).await {
            return EntryState::RobotsBlocked;
        }

        self.apply_crawl_delay(&url);
        self.rate_limiter.throttle(&url).await;

        tracing::info!(
            "[{}/{}] depth {}: {}",
            self.stats.crawled + 1,
            self.settings.max_urls,
            entry.depth,
            url
        );
        tracing::debug!("{} -> {}", url, EntryState::Fetching);

        match fetch_url(&self.client, url.as_str()).await {
            FetchResult::Success {
                final_url,
                status_code,
                content_type,
                body,
            } => self.handle_success(&url, entry.depth, final_url, status_code, content_type, body),

            FetchResult::SkippedNonHtml { content_type } => {
                tracing::info!("Skipping {}: not HTML ({})", url, content_type);
                EntryState::SkippedNonHtml
            }

            FetchResult::Failure { kind, detail } => {
                tracing::warn!("Failed to fetch {} ({}): {}", url, kind, detail);
                EntryState::Failed
            }
        }
    }

    fn handle_success(
        &mut self,
        url: &NormalizedUrl,
        depth: u32,
        final_url: String,
        status_code: u16,
        content_type: String,
        body: String,
    ) -> EntryState {
        // Relative links resolve against where the page actually lives after redirects
        let base = Url::parse(&final_url).unwrap_or_else(|_| url.as_url().clone());
        let parsed = parse_html(&body, &base);

        let doc = Document {
            doc_id: self.next_doc_id,
            url: url.as_str().to_string(),
            final_url,
            status_code,
            content_type,
            title: parsed.title,
            depth,
            fetched_at: Utc::now(),
            body,
        };

        if let Err(e) = self.store.put(&doc) {
            tracing::error!("Failed to store {}: {}", url, e);
            return EntryState::Failed;
        }
        self.next_doc_id += 1;

        if depth < self.settings.max_depth {
            let added = self.frontier.enqueue_children(&parsed.links, depth);
            tracing::debug!(
                "{}: {} link(s), {} {} at depth {}",
                url,
                parsed.links.len(),
                added,
                EntryState::Queued,
                depth + 1
            );
        }

        EntryState::Fetched
    }

    /// Hands a cached robots.txt Crawl-delay to the rate limiter once per origin
    fn apply_crawl_delay(&mut self, url: &NormalizedUrl) {
        if !self.settings.respect_crawl_delay {
            return;
        }

        let origin = url.origin();
        let already_set = self
            .rate_limiter
            .state(&origin)
            .is_some_and(|state| state.crawl_delay.is_some());
        if already_set {
            return;
        }

        if let Some(delay) = self.robots.crawl_delay(url) {
            tracing::info!("Using Crawl-delay of {:?} for {}", delay, origin);
            self.rate_limiter.set_crawl_delay(&origin, delay);
        }
    }
}
