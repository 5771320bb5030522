//! Pipeline entry points for extraction operations.
//!
//! - `run_extract`: Extract one listing and persist it
//! - `run_batch`: Extract many listings with a cool-down between them
//! - `run_validate`: Check configuration before a run
//! - `render_listing`: Format a record for display

pub mod batch;
pub mod extract;
pub mod report;
pub mod validate;

pub use batch::{BatchOutcome, collect_urls, run_batch};
pub use extract::{ExtractOutcome, run_extract};
pub use report::render_listing;
pub use validate::run_validate;
