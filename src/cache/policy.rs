//! Fetch-policy classification for the offline asset cache.
//!
//! Every request falls into exactly one policy, decided from its URL
//! alone: API and analytics traffic is never cached, navigations and
//! page resources prefer fresh copies, and everything else is served
//! from the cache when possible.

use url::Url;

/// Hosts whose traffic is passed straight through, never cached.
const ANALYTICS_HOSTS: &[&str] = &["googletagmanager.com", "google-analytics.com"];

/// Extensions whose resources prefer the network so deployed updates
/// show up on the next load. Matched against the end of the path, so
/// `.js` does not capture `.json`.
const NETWORK_FIRST_EXTENSIONS: &[&str] = &[".html", ".css", ".js"];

/// How a request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Straight to the network, no cache read or write.
    Bypass,
    /// Network first, cached copy as the offline fallback.
    NetworkFirst,
    /// Cached copy first, network on a miss.
    CacheFirst,
}

/// Classify one request URL. `api_host` is the combining service's host;
/// its responses are dynamic documents that must never be replayed.
pub fn classify(url: &Url, api_host: &str) -> FetchPolicy {
    let host = url.host_str().unwrap_or_default();
    if host.eq_ignore_ascii_case(api_host) {
        return FetchPolicy::Bypass;
    }
    if ANALYTICS_HOSTS
        .iter()
        .any(|analytics| host == *analytics || host.ends_with(&format!(".{}", analytics)))
    {
        return FetchPolicy::Bypass;
    }

    let path = url.path();
    if path.ends_with('/')
        || NETWORK_FIRST_EXTENSIONS
            .iter()
            .any(|ext| path.ends_with(ext))
    {
        return FetchPolicy::NetworkFirst;
    }

    FetchPolicy::CacheFirst
}
