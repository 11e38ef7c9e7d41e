//! Output module for crawl summaries
//!
//! This module handles:
//! - The statistics record every crawl produces
//! - Printing it for humans
//! - Exporting it as JSON

pub mod stats;

pub use stats::{print_statistics, write_statistics, CrawlStats};
