//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and response classification
//! - HTML parsing and link extraction
//! - Per-origin rate limiting
//! - The breadth-first frontier
//! - Overall crawl orchestration

mod engine;
mod fetcher;
mod frontier;
mod parser;
mod rate_limiter;

pub use engine::CrawlEngine;
pub use fetcher::{build_http_client, fetch_url, is_html, FetchFailureKind, FetchResult};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{extract_links, parse_html, ParsedPage};
pub use rate_limiter::{DomainRateLimiter, MAX_CRAWL_DELAY};

use crate::config::Config;
use crate::output::CrawlStats;
use crate::storage::open_store;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the document store
/// 2. Build the engine and its HTTP client
/// 3. Crawl breadth-first from the seeds until a stop condition
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seeds` - Seed URLs in crawl order
/// * `cancel` - Token that stops the crawl between requests
///
/// # Returns
///
/// * `Ok(CrawlStats)` - The crawl ran (it may still have fetched nothing)
/// * `Err(CrawlError)` - Setup failed
pub async fn crawl(
    config: &Config,
    seeds: Vec<String>,
    cancel: CancellationToken,
) -> crate::Result<CrawlStats> {
    let store = open_store(&config.output)?;
    let mut engine = CrawlEngine::new(config, seeds, store)?.with_cancellation(cancel);
    Ok(engine.run().await)
}
