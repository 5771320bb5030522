// src/services/listing.rs

//! Extraction orchestrator.
//!
//! Tries the lightweight fetch first and escalates to the full-render fetch
//! once when the page is blocked or the request fails. There is no third
//! strategy and no retry loop.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, ListingRecord};
use crate::services::FieldExtractor;
use crate::services::fetch::{BrowserFetcher, DirectFetcher, FetchOutcome, PageFetcher};

/// Turns a listing URL into a [`ListingRecord`].
pub struct ListingExtractor {
    fields: Arc<FieldExtractor>,
    cheap: Box<dyn PageFetcher>,
    expensive: Box<dyn PageFetcher>,
}

impl ListingExtractor {
    /// Assemble an extractor from explicit strategies.
    pub fn new(
        fields: Arc<FieldExtractor>,
        cheap: Box<dyn PageFetcher>,
        expensive: Box<dyn PageFetcher>,
    ) -> Self {
        Self {
            fields,
            cheap,
            expensive,
        }
    }

    /// Wire the HTTP fetch and the headless browser from configuration.
    ///
    /// The configuration is validated first, so range errors surface here
    /// rather than during a fetch.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let fields = Arc::new(FieldExtractor::new(config)?);
        let cheap = DirectFetcher::new(&config.fetch, Arc::clone(&fields))?;
        let expensive = BrowserFetcher::new(&config.browser, &config.fetch);
        Ok(Self::new(fields, Box::new(cheap), Box::new(expensive)))
    }

    /// Extract one listing.
    ///
    /// Only a failure of the expensive strategy is returned as an error;
    /// unresolved fields are simply `None`.
    pub async fn extract(&self, url: &str) -> Result<ListingRecord> {
        match self.cheap.fetch(url).await {
            Ok(FetchOutcome::Page(page)) => {
                log::info!("Fetched {url} via {}", page.strategy);
                return Ok(self.fields.extract(&page));
            }
            Ok(FetchOutcome::Blocked { reason }) => {
                log::warn!(
                    "{} fetch blocked for {url}: {reason}. Escalating to {}",
                    self.cheap.kind(),
                    self.expensive.kind()
                );
            }
            Err(e) => {
                log::warn!(
                    "{} fetch failed for {url}: {e}. Escalating to {}",
                    self.cheap.kind(),
                    self.expensive.kind()
                );
            }
        }

        match self.expensive.fetch(url).await {
            Ok(FetchOutcome::Page(page)) => {
                log::info!("Fetched {url} via {}", page.strategy);
                Ok(self.fields.extract(&page))
            }
            Ok(FetchOutcome::Blocked { reason }) => Err(AppError::extraction(
                url,
                format!("{} fetch blocked: {reason}", self.expensive.kind()),
            )),
            Err(e) => {
                log::error!("{} fetch failed for {url}: {e}", self.expensive.kind());
                Err(AppError::extraction(url, e))
            }
        }
    }
}
