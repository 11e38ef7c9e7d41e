use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default file name for end-of-run statistics
pub const STATS_FILE_NAME: &str = "crawl_stats.json";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub seeds: SeedsConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum BFS depth from the seed URLs (seeds are depth 0)
    pub max_depth: u32,

    /// Stop after this many successful fetches
    pub max_urls: u64,

    /// Minimum delay between requests to the same origin (seconds)
    pub delay_seconds: f64,

    /// Only follow links whose host matches a seed host
    pub same_domain_only: bool,

    /// Consult robots.txt before fetching
    pub respect_robots: bool,

    /// Stretch the per-origin delay to a robots.txt Crawl-delay
    pub respect_crawl_delay: bool,

    /// Timeout for page requests (seconds)
    pub request_timeout_secs: u64,

    /// Timeout for robots.txt requests (seconds)
    pub robots_timeout_secs: u64,
}

impl CrawlerConfig {
    /// Minimum spacing between two requests to one origin
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_seconds.max(0.0))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn robots_timeout(&self) -> Duration {
        Duration::from_secs(self.robots_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_urls: 100,
            delay_seconds: 1.0,
            same_domain_only: false,
            respect_robots: true,
            respect_crawl_delay: true,
            request_timeout_secs: 15,
            robots_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler, also the robots.txt product token
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }

    /// The token matched against `User-agent:` lines in robots.txt
    pub fn robots_token(&self) -> &str {
        &self.crawler_name
    }
}

/// Layout used to persist fetched documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<doc_id>.html` body plus `<doc_id>.json` metadata sidecar
    #[default]
    Files,
    /// A single `documents.db` SQLite catalog
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory that receives the documents
    pub documents_dir: String,

    /// Storage layout inside `documents_dir`
    pub format: OutputFormat,

    /// Where the end-of-run statistics are written
    pub stats_path: Option<String>,
}

impl OutputConfig {
    /// Resolves the statistics path
    ///
    /// Defaults to `crawl_stats.json` beside the documents directory, never
    /// inside it, so the directory holds nothing but documents.
    pub fn stats_path(&self) -> PathBuf {
        if let Some(path) = &self.stats_path {
            return PathBuf::from(path);
        }

        let docs = Path::new(self.documents_dir.trim_end_matches(['/', '\\']));
        match (docs.file_name(), docs.parent()) {
            (Some(_), Some(parent)) => parent.join(STATS_FILE_NAME),
            // `.`, `..` and similar have no name to step out of
            _ => docs.join("..").join(STATS_FILE_NAME),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            documents_dir: "docs".to_string(),
            format: OutputFormat::Files,
            stats_path: None,
        }
    }
}

/// Seed URL sources
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedsConfig {
    /// Path to a seed file (one URL per line)
    pub file: Option<String>,

    /// Inline seed URLs, crawled after the file's seeds
    pub urls: Vec<String>,
}
