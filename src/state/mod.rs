//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `EntryState`: The lifecycle of a single frontier entry (queued, rejected, fetched, ...)
//! - `DomainState`: Per-origin request timing used by the rate limiter

mod domain_state;
mod entry_state;

// Re-export main types
pub use domain_state::DomainState;
pub use entry_state::EntryState;
