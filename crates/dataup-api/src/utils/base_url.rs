//! Externally visible base address for content URLs.

use axum::http::{header, HeaderMap};
use dataup_core::Config;

/// Pick the base address content URLs are built from.
///
/// Order: configured `PUBLIC_BASE_URL`, then the request's `Host` header, then
/// `http://localhost:{port}`.
pub fn resolve_base_url(config: &Config, headers: &HeaderMap) -> String {
    if let Some(configured) = config.public_base_url() {
        return configured.to_string();
    }

    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .and_then(base_url_from_host)
        .unwrap_or_else(|| config.fallback_base_url())
}

/// `http://{host}`, omitting an explicit default port.
pub fn base_url_from_host(host: &str) -> Option<String> {
    let host = host.trim();
    if host.is_empty() || host.contains(|c: char| c.is_whitespace() || c == '/') {
        return None;
    }

    let host = host.strip_suffix(":80").unwrap_or(host);
    Some(format!("http://{}", host))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config(pairs: &[(&'static str, &'static str)]) -> Config {
        let pairs = pairs.to_vec();
        Config::from_lookup(move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_host_with_port_kept() {
        assert_eq!(
            base_url_from_host("example.com:8080").as_deref(),
            Some("http://example.com:8080")
        );
    }

    #[test]
    fn test_default_port_dropped() {
        assert_eq!(
            base_url_from_host("example.com:80").as_deref(),
            Some("http://example.com")
        );
        assert_eq!(
            base_url_from_host("example.com").as_deref(),
            Some("http://example.com")
        );
    }

    #[test]
    fn test_invalid_host_rejected() {
        assert_eq!(base_url_from_host(""), None);
        assert_eq!(base_url_from_host("evil.com/path"), None);
    }

    #[test]
    fn test_configured_base_wins() {
        let config = config(&[("PUBLIC_BASE_URL", "https://videos.example.com")]);
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:9000"));

        assert_eq!(
            resolve_base_url(&config, &headers),
            "https://videos.example.com"
        );
    }

    #[test]
    fn test_host_header_then_fallback() {
        let config = config(&[("PORT", "9000")]);
        let mut headers = HeaderMap::new();
        assert_eq!(resolve_base_url(&config, &headers), "http://localhost:9000");

        headers.insert(header::HOST, HeaderValue::from_static("media.local:9000"));
        assert_eq!(resolve_base_url(&config, &headers), "http://media.local:9000");
    }
}
