// src/pipeline/extract.rs

//! Single-listing extraction pipeline.

use crate::error::Result;
use crate::models::ListingRecord;
use crate::services::ListingExtractor;
use crate::storage::{ListingStore, UpsertOutcome};

/// What `run_extract` produced.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    pub url: String,
    pub record: ListingRecord,
    /// `None` when persistence was skipped
    pub upsert: Option<UpsertOutcome>,
}

/// Extract one listing and, when a store is given, upsert it by URL.
///
/// A storage failure does not discard the extracted record; it is reported
/// through an unsuccessful [`UpsertOutcome`].
pub async fn run_extract(
    extractor: &ListingExtractor,
    store: Option<&dyn ListingStore>,
    url: &str,
) -> Result<ExtractOutcome> {
    log::info!("Extracting listing: {url}");
    let record = extractor.extract(url).await?;
    log::info!(
        "Resolved {}/5 fields for {url}",
        record.resolved_fields()
    );

    let upsert = match store {
        Some(store) => Some(match store.upsert(url, &record).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Failed to store {url}: {e}");
                UpsertOutcome {
                    success: false,
                    message: format!("Storage error: {e}"),
                    created: false,
                }
            }
        }),
        None => None,
    };

    Ok(ExtractOutcome {
        url: url.to_string(),
        record,
        upsert,
    })
}
