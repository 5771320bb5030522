// src/pipeline/report.rs

//! Human-readable rendering of extracted listings.

use std::fmt::Write;

use crate::locale::LocaleConfig;
use crate::models::ListingRecord;

/// Render a listing as a text block, one field per line.
///
/// Unresolved fields show the locale placeholder; the schedule always lists
/// all seven days under their localized labels.
pub fn render_listing(record: &ListingRecord, locale: &LocaleConfig) -> String {
    let labels = &locale.labels;
    let missing = &locale.placeholders;

    let coordinates = record.coordinates.map(|c| c.to_string());
    let rows = [
        (&labels.title, record.title.as_deref(), &missing.title),
        (&labels.rating, record.rating.as_deref(), &missing.rating),
        (
            &labels.reviews,
            record.review_phrase.as_deref(),
            &missing.reviews,
        ),
        (
            &labels.coordinates,
            coordinates.as_deref(),
            &missing.coordinates,
        ),
        (
            &labels.categories,
            record.categories.as_deref(),
            &missing.categories,
        ),
    ];

    let mut out = String::new();
    for (label, value, placeholder) in rows {
        let _ = writeln!(out, "{label}: {}", value.unwrap_or(placeholder));
    }

    let _ = writeln!(out, "{}:", labels.hours);
    for (day, hours) in record.weekly_hours.iter() {
        let _ = writeln!(out, "  {}: {hours}", locale.label(day));
    }

    out
}
