//! Service layer for the extraction engine.
//!
//! This module contains the business logic for:
//! - Page acquisition (`fetch`: `DirectFetcher`, `BrowserFetcher`)
//! - Field extraction from markup (`FieldExtractor`)
//! - Opening-hours normalization (`schedule`)
//! - Cheap-then-expensive orchestration (`ListingExtractor`)
//! - Social profile lookup (`ProfileDiscovery`)

pub mod discovery;
pub mod fetch;
pub mod fields;
pub mod listing;
pub mod schedule;

pub use discovery::{DenyList, ProfileDiscovery, ProfileSearch, normalize_name};
pub use fields::FieldExtractor;
pub use listing::ListingExtractor;
