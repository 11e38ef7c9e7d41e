//! HTTP fetcher implementation
//!
//! This module handles page requests for the crawler:
//! - Building the HTTP client with the crawler's identity
//! - GET requests with redirect following and a bounded timeout
//! - Status and Content-Type validation
//! - Error classification

use crate::config::UserAgentConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;

/// Maximum number of redirects followed for one request
const MAX_REDIRECTS: usize = 10;

/// Why a fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// The request did not complete within the timeout
    Timeout,
    /// Connection, TLS, redirect or body-read failure
    Network,
    /// The server answered with a non-2xx status
    Http(u16),
}

impl fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::Network => f.write_str("network error"),
            Self::Http(status) => write!(f, "HTTP {}", status),
        }
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Response was not HTML; the body is not read
    SkippedNonHtml {
        /// The Content-Type received (empty if absent)
        content_type: String,
    },

    /// The request failed
    Failure {
        kind: FetchFailureKind,
        /// Human-readable detail for logs
        detail: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Default timeout for every request made with this client
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use strata_crawler::config::UserAgentConfig;
/// use strata_crawler::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "StrataBot".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/bot".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

    Client::builder()
        .user_agent(config.header_value())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// # Request Flow
///
/// 1. Send GET, following redirects
/// 2. Non-2xx status → `Failure { kind: Http(status) }`
/// 3. Content-Type not starting with `text/html` → `SkippedNonHtml`
/// 4. Read the body → `Success`
///
/// | Condition | Result |
/// |-----------|--------|
/// | Request timeout | `Failure(Timeout)` |
/// | Connection refused / DNS / TLS | `Failure(Network)` |
/// | Too many redirects | `Failure(Network)` |
/// | HTTP 4xx / 5xx | `Failure(Http)` |
/// | `application/pdf` etc. | `SkippedNonHtml` |
///
/// Never retries; the caller decides what a failure means.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::Failure {
            kind: FetchFailureKind::Http(status.as_u16()),
            detail: format!("HTTP {} from {}", status, final_url),
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .trim()
        .to_string();

    if !is_html(&content_type) {
        return FetchResult::SkippedNonHtml { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => classify_error(e),
    }
}

/// Returns true for `text/html` content types, parameters allowed
pub fn is_html(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("text/html")
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let kind = if e.is_timeout() {
        FetchFailureKind::Timeout
    } else {
        FetchFailureKind::Network
    };

    FetchResult::Failure {
        kind,
        detail: e.to_string(),
    }
}
