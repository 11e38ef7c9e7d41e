/// Frontier entry state definitions
///
/// Every popped frontier entry ends in exactly one terminal state. Only
/// `Fetched` entries expand into child entries.
use std::fmt;

/// Represents the state of a frontier entry in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    // ===== Active States =====
    /// Entry is waiting in the frontier
    Queued,

    /// Entry passed all checks and its request is in flight
    Fetching,

    // ===== Terminal Success States =====
    /// Page was fetched and persisted
    Fetched,

    // ===== Terminal Rejection States (no request issued) =====
    /// Entry depth is beyond the configured maximum
    DepthExceeded,

    /// URL failed normalization
    Malformed,

    /// URL was already attempted in this run
    AlreadyVisited,

    /// URL's host is not a seed host while same-domain-only is on
    DomainRestricted,

    /// robots.txt disallows the URL
    RobotsBlocked,

    // ===== Terminal Failure States =====
    /// Fetch timed out, failed on the network, returned a non-2xx status,
    /// or the document could not be persisted
    Failed,

    /// Response was not HTML
    SkippedNonHtml,
}

impl EntryState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::Fetching)
    }

    /// Returns true if this represents a successful fetch
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Fetched)
    }

    /// Returns true if the entry was discarded before any request was issued
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            Self::DepthExceeded
                | Self::Malformed
                | Self::AlreadyVisited
                | Self::DomainRestricted
                | Self::RobotsBlocked
        )
    }

    /// Returns true if this outcome counts toward the failure total
    ///
    /// Non-HTML responses are a skip, not an error, but are still reported
    /// with the failures.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::SkippedNonHtml)
    }

    /// Short snake_case name for logs and metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::DepthExceeded => "depth_exceeded",
            Self::Malformed => "malformed",
            Self::AlreadyVisited => "already_visited",
            Self::DomainRestricted => "domain_restricted",
            Self::RobotsBlocked => "robots_blocked",
            Self::Failed => "failed",
            Self::SkippedNonHtml => "skipped_non_html",
        }
    }

    /// Returns all possible entry states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Queued,
            Self::Fetching,
            Self::Fetched,
            Self::DepthExceeded,
            Self::Malformed,
            Self::AlreadyVisited,
            Self::DomainRestricted,
            Self::RobotsBlocked,
            Self::Failed,
            Self::SkippedNonHtml,
        ]
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
