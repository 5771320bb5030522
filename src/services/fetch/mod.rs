// src/services/fetch/mod.rs

//! Page acquisition strategies.
//!
//! Two interchangeable backends share the [`PageFetcher`] contract:
//! - [`DirectFetcher`]: one HTTP request with browser-like headers
//! - [`BrowserFetcher`]: a stealth headless Chrome session
//!
//! A fetch either yields a page, reports a challenge (`Blocked`), or fails
//! with an error.

mod browser;
mod challenge;
mod direct;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use browser::BrowserFetcher;
pub use challenge::ChallengeDetector;
pub use direct::DirectFetcher;

/// Which backend produced a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Plain HTTP request
    Lightweight,
    /// Rendered by a real browser engine
    FullRender,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Lightweight => f.write_str("lightweight"),
            StrategyKind::FullRender => f.write_str("full-render"),
        }
    }
}

/// Raw markup of a listing page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    /// URL after redirects
    pub final_url: String,
    pub strategy: StrategyKind,
}

/// Result of a fetch that reached the site.
#[derive(Debug)]
pub enum FetchOutcome {
    Page(FetchedPage),
    /// An anti-automation challenge was served instead of the listing
    Blocked { reason: String },
}

/// A page acquisition backend.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Fetch a listing page. `Err` means the fetch itself failed.
    async fn fetch(&self, url: &str) -> Result<FetchOutcome>;
}
