//! Utility functions and helpers.

pub mod http;

use std::sync::LazyLock;

use regex::Regex;

/// Listing URL pattern, compiled once.
static LISTING_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://yandex\.(?:ru|com)/maps/org/[^\s]+")
        .expect("listing URL pattern is a valid regex")
});

/// Extract the first listing URL from free text, e.g. a pasted chat message.
pub fn find_listing_url(text: &str) -> Option<String> {
    LISTING_URL.find(text).map(|m| m.as_str().to_string())
}
