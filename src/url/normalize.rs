use crate::url::domain::{authority_of, origin_of};
use crate::UrlError;
use std::fmt;
use url::Url;

/// A URL in canonical crawl form
///
/// Two inputs that differ only by fragment, trailing slash, host case or an
/// explicit default port normalize to the same value. The string form is the
/// identity used by the visited set and the frontier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the `scheme://host[:port]` origin of this URL
    pub fn origin(&self) -> String {
        origin_of(&self.0)
    }

    /// Returns the `host[:port]` authority of this URL
    pub fn authority(&self) -> String {
        // normalize_url guarantees a host
        authority_of(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Normalizes a URL into its canonical crawl form
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject any scheme other than `http` and `https`
/// 3. Reject URLs without a host
/// 4. Remove the fragment
/// 5. Drop an empty query string (trailing `?`)
/// 6. Remove trailing slashes from the path, except for the root `/`
///
/// Host lowercasing, default-port removal and percent-encoding are handled
/// by the WHATWG parser. Path and non-empty query are otherwise kept as-is.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(NormalizedUrl)` - The canonical URL
/// * `Err(UrlError)` - The input is not a crawlable URL
///
/// # Examples
///
/// ```
/// use strata_crawler::url::normalize_url;
///
/// let url = normalize_url("http://A.TEST/page/#top").unwrap();
/// assert_eq!(url.as_str(), "http://a.test/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<NormalizedUrl, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingHost),
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        // Trim every trailing slash so the result is a fixed point
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
        url.set_path(&trimmed);
    }

    Ok(NormalizedUrl(url))
}
