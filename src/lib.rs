// src/lib.rs

//! placecard: extracts business facts from map-service listing pages.

pub mod error;
pub mod locale;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
