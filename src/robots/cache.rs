//! Per-origin robots.txt cache
//!
//! Entries are created on the first URL seen for an origin and live for the
//! whole crawl run.

use crate::robots::ParsedRobots;
use std::collections::HashMap;

/// What is known about one origin's robots.txt
#[derive(Debug, Clone)]
pub enum RobotsEntry {
    /// robots.txt was fetched and parsed
    Rules(ParsedRobots),

    /// robots.txt could not be fetched; everything on the origin is allowed
    Unavailable,
}

impl RobotsEntry {
    /// Checks if a URL is allowed under this entry
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self {
            Self::Rules(robots) => robots.is_allowed(url, user_agent),
            Self::Unavailable => true,
        }
    }

    /// Gets the crawl delay for the user agent, in seconds
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        match self {
            Self::Rules(robots) => robots.crawl_delay(user_agent),
            Self::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

/// Cache of robots.txt entries keyed by origin (`scheme://host[:port]`)
///
/// There is no expiry: a crawl run sees each origin's robots.txt once.
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: HashMap<String, RobotsEntry>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, origin: &str) -> Option<&RobotsEntry> {
        self.entries.get(origin)
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.entries.contains_key(origin)
    }

    /// Stores the entry for an origin unless one already exists
    ///
    /// The first answer for an origin is final for the run.
    pub fn insert(&mut self, origin: String, entry: RobotsEntry) {
        self.entries.entry(origin).or_insert(entry);
    }

    /// Number of origins with a cached entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
