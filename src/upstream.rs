//! Upstream HTTP plumbing shared by the geocoding and store clients.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::config::{Config, ConfigError};

/// Longest slice of an upstream error body that ends up in log output.
pub const MAX_LOGGED_BODY_CHARS: usize = 300;

/// Builds the shared reqwest client with the configured timeout and user agent.
pub fn build_http_client(config: &Config) -> Result<Client, ConfigError> {
    Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| ConfigError::Invalid {
            key: "GEOCODER_USER_AGENT",
            reason: format!("cannot build HTTP client: {e}"),
        })
}

/// Parses a provider base URL, normalised to end with exactly one slash so
/// that `Url::join` appends instead of replacing the last path segment.
pub fn parse_base_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ConfigError::Invalid {
        key,
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

/// Truncates an upstream body for logging, respecting char boundaries.
pub fn body_snippet(body: &str) -> String {
    body.chars().take(MAX_LOGGED_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("TEST_URL", "https://example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/");
        assert_eq!(
            url.join("search").unwrap().as_str(),
            "https://example.com/api/search"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        let result = parse_base_url("TEST_URL", "not a url");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "TEST_URL", .. })
        ));
    }

    #[test]
    fn test_body_snippet_truncates() {
        let long = "é".repeat(500);
        assert_eq!(body_snippet(&long).chars().count(), MAX_LOGGED_BODY_CHARS);
        assert_eq!(body_snippet("short"), "short");
    }
}
