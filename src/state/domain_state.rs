use std::time::{Duration, Instant};

/// Tracks request timing for one origin
///
/// The rate limiter owns one of these per `scheme://host[:port]`.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of requests issued to this origin in the current crawl
    pub request_count: u32,

    /// When the last request to this origin was issued
    pub last_request_time: Option<Instant>,

    /// Crawl-delay requested by the origin's robots.txt, if honored
    pub crawl_delay: Option<Duration>,
}

impl DomainState {
    /// Creates a new DomainState with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The spacing this origin requires: the larger of the configured delay
    /// and its robots.txt crawl delay
    pub fn effective_delay(&self, min_delay: Duration) -> Duration {
        match self.crawl_delay {
            Some(crawl_delay) => min_delay.max(crawl_delay),
            None => min_delay,
        }
    }

    /// Checks if a request can be made to this origin at `now`
    pub fn can_request(&self, min_delay: Duration, now: Instant) -> bool {
        self.time_until_next_request(min_delay, now).is_none()
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, min_delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let delay = self.effective_delay(min_delay);
        let elapsed = now.saturating_duration_since(last);
        if elapsed < delay {
            Some(delay - elapsed)
        } else {
            None
        }
    }

    /// Records that a request was issued to this origin
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }
}
