//! End-of-run crawl statistics
//!
//! This module provides the summary record a crawl produces and the
//! functions for displaying and exporting it.

use crate::state::EntryState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Pages fetched and persisted
    pub crawled: u64,

    /// Attempts that ended in a fetch error, non-HTML content or a storage error
    pub failed: u64,

    /// URLs refused by robots.txt
    pub blocked: u64,

    /// Distinct URLs the crawler committed to
    pub total_visited: u64,

    /// Wall-clock duration of the run in seconds
    pub elapsed_time: f64,

    /// `elapsed_time / max(crawled, 1)`
    pub avg_time_per_url: f64,
}

impl CrawlStats {
    /// Counts the outcome of one frontier entry
    ///
    /// Pre-fetch rejections other than robots blocks are not counted.
    pub fn record(&mut self, state: EntryState) {
        match state {
            EntryState::Fetched => self.crawled += 1,
            EntryState::RobotsBlocked => self.blocked += 1,
            s if s.is_failure() => self.failed += 1,
            _ => {}
        }
    }

    /// Fills in the totals once the run has stopped
    pub fn finish(&mut self, elapsed: Duration, total_visited: usize) {
        self.total_visited = total_visited as u64;
        self.elapsed_time = elapsed.as_secs_f64();
        self.avg_time_per_url = self.elapsed_time / self.crawled.max(1) as f64;
    }

    /// Number of HTTP attempts made (successes plus failures)
    pub fn attempted(&self) -> u64 {
        self.crawled + self.failed
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("  Pages crawled:    {}", stats.crawled);
    println!("  Failed:           {}", stats.failed);
    println!("  Robots blocked:   {}", stats.blocked);
    println!("  URLs visited:     {}", stats.total_visited);
    println!("  Elapsed time:     {:.2}s", stats.elapsed_time);
    println!("  Avg time per URL: {:.2}s", stats.avg_time_per_url);
    println!();

    let attempted = stats.attempted();
    let success_rate = if attempted > 0 {
        (stats.crawled as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} fetches succeeded)",
        success_rate, stats.crawled, attempted
    );
}

/// Writes statistics as pretty-printed JSON, creating parent directories
pub fn write_statistics(stats: &CrawlStats, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(stats)?;
    fs::write(path, json)
}
