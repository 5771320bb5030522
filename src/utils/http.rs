// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue,
    UPGRADE_INSECURE_REQUESTS,
};

use crate::error::{AppError, Result};
use crate::models::FetchConfig;

const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Headers a desktop Chrome sends on top-level navigation.
pub fn browser_headers(config: &FetchConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    let client_hints = [
        (
            "sec-ch-ua",
            r#""Chromium";v="124", "Google Chrome";v="124", "Not-A.Brand";v="99""#,
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", r#""Windows""#),
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
    ];
    for (name, value) in client_hints {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::config(format!("invalid header value {value:?}: {e}")))
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &FetchConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(browser_headers(config)?)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers(&FetchConfig::default()).unwrap();
        assert!(headers.contains_key(ACCEPT_LANGUAGE));
        assert_eq!(headers["sec-fetch-mode"], "navigate");
    }

    #[test]
    fn test_rejects_invalid_language_header() {
        let config = FetchConfig {
            accept_language: "ru\nen".to_string(),
            ..FetchConfig::default()
        };
        assert!(browser_headers(&config).is_err());
    }

    #[test]
    fn test_create_client() {
        assert!(create_async_client(&FetchConfig::default()).is_ok());
    }
}
