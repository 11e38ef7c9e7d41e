//! URL handling module
//!
//! This module provides URL normalization and the origin/authority helpers
//! used to key per-site state (robots.txt cache, rate limiter, same-domain
//! restriction).

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{authority_of, origin_of};
pub use normalize::{normalize_url, NormalizedUrl};
