//! Robots.txt handling module
//!
//! This module fetches, parses and caches robots.txt per origin and answers
//! "may this URL be fetched?". Any failure to obtain a ruleset resolves to
//! "allowed" for the rest of the run.

mod cache;
mod gate;
mod parser;

pub use cache::{RobotsCache, RobotsEntry};
pub use gate::RobotsGate;
pub use parser::ParsedRobots;

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why an origin's robots.txt could not be used
#[derive(Debug, Error)]
pub enum RobotsUnavailable {
    #[error("robots.txt returned HTTP {0}")]
    Status(u16),

    #[error("robots.txt request timed out")]
    Timeout,

    #[error("robots.txt request failed: {0}")]
    Network(String),
}

/// Fetches and parses robots.txt for an origin
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `origin` - The origin, as `scheme://host[:port]`
/// * `timeout` - Upper bound for the whole request
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - robots.txt was served with a 2xx status
/// * `Err(RobotsUnavailable)` - Missing, erroring or unreachable
pub async fn fetch_robots(
    client: &Client,
    origin: &str,
    timeout: Duration,
) -> Result<ParsedRobots, RobotsUnavailable> {
    let robots_url = format!("{}/robots.txt", origin);

    let response = client
        .get(&robots_url)
        .timeout(timeout)
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(RobotsUnavailable::Status(status.as_u16()));
    }

    let body = response.text().await.map_err(classify_error)?;
    Ok(ParsedRobots::from_content(&body))
}

fn classify_error(e: reqwest::Error) -> RobotsUnavailable {
    if e.is_timeout() {
        RobotsUnavailable::Timeout
    } else {
        RobotsUnavailable::Network(e.to_string())
    }
}
