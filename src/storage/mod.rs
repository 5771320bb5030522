//! Storage abstractions for extracted listings.
//!
//! Listings are keyed by their source URL. Writing the same URL twice
//! replaces the record and keeps the first `first_seen` timestamp.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml               # Engine configuration
//! ├── listings.json             # All stored listings, keyed by URL
//! └── profile_deny_list.txt     # Names without a social profile
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::ListingRecord;

// Re-export for convenience
pub use local::LocalStorage;

/// A listing as persisted by a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredListing {
    pub url: String,
    pub record: ListingRecord,
    /// When the URL was first stored
    pub first_seen: DateTime<Utc>,
    /// When the record was last replaced
    pub updated_at: DateTime<Utc>,
}

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub success: bool,
    /// Human-readable status line
    pub message: String,
    /// `true` for a new URL, `false` for an update
    pub created: bool,
}

impl UpsertOutcome {
    pub fn created(url: &str) -> Self {
        Self {
            success: true,
            message: format!("Added new listing {url}"),
            created: true,
        }
    }

    pub fn updated(url: &str) -> Self {
        Self {
            success: true,
            message: format!("Updated listing {url}"),
            created: false,
        }
    }
}

/// Trait for listing storage backends.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Insert or replace the record stored for `url`.
    async fn upsert(&self, url: &str, record: &ListingRecord) -> Result<UpsertOutcome>;

    /// Load the listing stored for `url`, if any.
    async fn get(&self, url: &str) -> Result<Option<StoredListing>>;

    /// Load every stored listing, oldest first.
    async fn load_all(&self) -> Result<Vec<StoredListing>>;
}
