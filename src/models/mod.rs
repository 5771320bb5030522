// src/models/mod.rs

//! Domain models for the extraction engine.
//!
//! This module contains the listing record, its value types, and the
//! configuration structures loaded from TOML.

mod config;
mod listing;
mod selectors;

// Re-export all public types
pub use config::{
    BatchConfig, BrowserConfig, CleaningConfig, Config, DiscoveryConfig, FetchConfig,
    LoggingConfig, StorageConfig,
};
pub use listing::{Coordinates, ListingRecord, WeeklyHours, Weekday};
pub use selectors::ListingSelectors;

pub use crate::locale::LocaleConfig;
