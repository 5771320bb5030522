// src/error.rs

//! Unified error handling for the extraction engine.

use std::fmt;

use thiserror::Error;

/// Result type alias for placecard operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Regular expression failed to compile
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-success HTTP status from the target site
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Headless browser failed to launch, navigate or render
    #[error("Browser error: {0}")]
    Browser(String),

    /// A blocking worker task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),

    /// Every fetch strategy has been exhausted for a listing
    #[error("Extraction failed for {url}: {message}")]
    Extraction { url: String, message: String },

    /// Profile search backend failed
    #[error("Search error: {0}")]
    Search(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a browser error from any displayable cause.
    pub fn browser(message: impl fmt::Display) -> Self {
        Self::Browser(message.to_string())
    }

    /// Create a terminal extraction error for a listing URL.
    pub fn extraction(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Extraction {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a search error.
    pub fn search(message: impl fmt::Display) -> Self {
        Self::Search(message.to_string())
    }
}
