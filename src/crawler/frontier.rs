//! Breadth-first frontier and visited set

use crate::url::NormalizedUrl;
use std::collections::{HashSet, VecDeque};

/// A URL waiting to be crawled
///
/// Seeds are stored as given so that malformed ones are rejected by the
/// engine like any other entry; discovered links are already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

/// FIFO queue of pending entries plus the set of URLs already committed to
///
/// Strict FIFO order keeps the crawl in breadth-first layers: every entry at
/// depth `d` is popped before any entry at depth `d + 1`.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a seed at depth 0
    pub fn push_seed(&mut self, url: impl Into<String>) {
        self.queue.push_back(FrontierEntry {
            url: url.into(),
            depth: 0,
        });
    }

    /// Removes the next entry in FIFO order
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    pub fn is_visited(&self, url: &NormalizedUrl) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Adds a URL to the visited set
    ///
    /// Returns false if it was already present. The set never shrinks.
    pub fn mark_visited(&mut self, url: &NormalizedUrl) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    /// Queues every not-yet-visited link at `parent_depth + 1`
    ///
    /// Returns how many entries were added. A link may still be queued more
    /// than once when several pages reference it before it is visited; the
    /// engine discards the later copies as already visited.
    pub fn enqueue_children<'a, I>(&mut self, links: I, parent_depth: u32) -> usize
    where
        I: IntoIterator<Item = &'a NormalizedUrl>,
    {
        let depth = parent_depth.saturating_add(1);
        let mut added = 0;

        for link in links {
            if self.is_visited(link) {
                continue;
            }
            self.queue.push_back(FrontierEntry {
                url: link.as_str().to_string(),
                depth,
            });
            added += 1;
        }

        added
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
