//! Hostname extraction
//!
//! Both the interceptor and the management surface reduce URLs to their
//! host before touching the whitelist, so the two sides always compare
//! like with like.

use url::Url;

/// Hostname of an absolute URL, or `None` if it does not parse or has no host
pub fn host_of_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(host.to_string()),
        _ => None,
    }
}

/// Reduce user input to a whitelist entry
///
/// Accepts either a bare domain (`Example.com`, `example.com/path`) or a
/// full URL. Returns the lower-cased hostname as produced by URL parsing.
pub fn normalize_domain(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return None;
    }

    if input.contains("://") {
        return host_of_url(input);
    }

    host_of_url(&format!("http://{}", input))
}
