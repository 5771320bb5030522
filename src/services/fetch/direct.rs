// src/services/fetch/direct.rs

//! Lightweight fetch: a single HTTP request.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use super::{ChallengeDetector, FetchOutcome, FetchedPage, PageFetcher, StrategyKind};
use crate::error::{AppError, Result};
use crate::models::FetchConfig;
use crate::services::FieldExtractor;
use crate::utils::http;

/// Fetches listing markup with one browser-like HTTP request.
pub struct DirectFetcher {
    client: Client,
    fields: Arc<FieldExtractor>,
    detector: ChallengeDetector,
}

impl DirectFetcher {
    /// Create a fetcher with a client configured from `config`.
    pub fn new(config: &FetchConfig, fields: Arc<FieldExtractor>) -> Result<Self> {
        let client = http::create_async_client(config)?;
        Ok(Self {
            client,
            fields,
            detector: ChallengeDetector::new(config),
        })
    }

    /// Classify a downloaded page.
    fn classify(&self, page: FetchedPage) -> FetchOutcome {
        let title = {
            let document = Html::parse_document(&page.html);
            self.fields.raw_title(&document)
        };

        match self.detector.inspect(title.as_deref(), &page.final_url) {
            Some(reason) => FetchOutcome::Blocked { reason },
            None => FetchOutcome::Page(page),
        }
    }
}

#[async_trait]
impl PageFetcher for DirectFetcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Lightweight
    }

    async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        log::debug!("Lightweight fetch: {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await?;

        Ok(self.classify(FetchedPage {
            html,
            final_url,
            strategy: StrategyKind::Lightweight,
        }))
    }
}
