use url::Url;

/// Returns the origin of a URL as `scheme://host[:port]`
///
/// The port is present only when it differs from the scheme default. This is
/// the key for robots.txt caching and per-site rate limiting.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use strata_crawler::url::origin_of;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(origin_of(&url), "https://example.com");
///
/// let url = Url::parse("http://example.com:8080/path").unwrap();
/// assert_eq!(origin_of(&url), "http://example.com:8080");
/// ```
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Returns the authority of a URL as `host[:port]`
///
/// Scheme is ignored, so `http` and `https` pages of the same host share an
/// authority. Used for the same-domain restriction.
///
/// # Returns
///
/// * `Some(String)` - The lowercase host, with the port if non-default
/// * `None` - If the URL has no host
pub fn authority_of(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
