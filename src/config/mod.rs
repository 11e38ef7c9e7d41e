//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and reading seed URL lists.
//!
//! # Example
//!
//! ```no_run
//! use strata_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, OutputFormat, SeedsConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use seeds::{load_seeds, parse_seeds};
pub use validation::validate;
