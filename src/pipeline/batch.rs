// src/pipeline/batch.rs

//! Batch extraction with a cool-down between listings.

use std::collections::HashSet;
use std::time::Duration;

use crate::services::ListingExtractor;
use crate::storage::ListingStore;
use crate::utils::find_listing_url;

use super::extract::run_extract;

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub total: usize,
    pub succeeded: usize,
    /// `(url, error message)` for every listing that could not be extracted
    pub failed: Vec<(String, String)>,
}

impl BatchOutcome {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Pull listing URLs out of a text document, one per line.
///
/// Lines without a listing URL are skipped; repeated URLs are kept once.
pub fn collect_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match find_listing_url(line) {
            Some(url) if seen.insert(url.clone()) => urls.push(url),
            Some(url) => log::debug!("Skipping duplicate URL on line {}: {url}", line_no + 1),
            None => log::warn!("No listing URL on line {}", line_no + 1),
        }
    }

    urls
}

/// Extract every URL in order, sleeping `cooldown` between consecutive
/// extractions. A failed listing is recorded and the batch moves on.
pub async fn run_batch(
    extractor: &ListingExtractor,
    store: Option<&dyn ListingStore>,
    urls: &[String],
    cooldown: Duration,
) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        total: urls.len(),
        ..BatchOutcome::default()
    };

    for (i, url) in urls.iter().enumerate() {
        if i > 0 && !cooldown.is_zero() {
            log::debug!("Cooling down for {}ms", cooldown.as_millis());
            tokio::time::sleep(cooldown).await;
        }

        log::info!("[{}/{}] {url}", i + 1, urls.len());
        match run_extract(extractor, store, url).await {
            Ok(_) => outcome.succeeded += 1,
            Err(e) => {
                log::error!("Failed to extract {url}: {e}");
                outcome.failed.push((url.clone(), e.to_string()));
            }
        }
    }

    log::info!(
        "Batch complete: {} succeeded, {} failed of {}",
        outcome.succeeded,
        outcome.failed_count(),
        outcome.total
    );
    outcome
}
