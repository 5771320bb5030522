// src/models/selectors.rs

//! CSS selectors for scraping a listing page.

use serde::{Deserialize, Serialize};

/// CSS selectors for each listing field.
///
/// Every field has a default matching the current markup of the map
/// service, so a config file only needs to override what changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Page metadata carrying the display name
    #[serde(default = "defaults::meta_title")]
    pub meta_title: String,

    /// Document title tag
    #[serde(default = "defaults::document_title")]
    pub document_title: String,

    /// Heading candidates, tried as one selector group
    #[serde(default = "defaults::heading")]
    pub heading: String,

    /// Rating badge
    #[serde(default = "defaults::rating")]
    pub rating: String,

    /// Structured review count metadata
    #[serde(default = "defaults::review_count_meta")]
    pub review_count_meta: String,

    /// Free-text description that mentions the review count
    #[serde(default = "defaults::description_meta")]
    pub description_meta: String,

    /// Visible element holding the review count text
    #[serde(default = "defaults::review_count_text")]
    pub review_count_text: String,

    /// Element carrying the `data-coordinates` attribute
    #[serde(default = "defaults::coordinates")]
    pub coordinates: String,

    /// Attribute holding `"lon,lat"`
    #[serde(default = "defaults::coordinates_attr")]
    pub coordinates_attr: String,

    /// Category tag labels
    #[serde(default = "defaults::categories")]
    pub categories: String,

    /// Opening hours metadata declarations
    #[serde(default = "defaults::opening_hours")]
    pub opening_hours: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            meta_title: defaults::meta_title(),
            document_title: defaults::document_title(),
            heading: defaults::heading(),
            rating: defaults::rating(),
            review_count_meta: defaults::review_count_meta(),
            description_meta: defaults::description_meta(),
            review_count_text: defaults::review_count_text(),
            coordinates: defaults::coordinates(),
            coordinates_attr: defaults::coordinates_attr(),
            categories: defaults::categories(),
            opening_hours: defaults::opening_hours(),
        }
    }
}

impl ListingSelectors {
    /// All selector strings with their field names, for validation.
    pub fn all(&self) -> [(&'static str, &str); 10] {
        [
            ("meta_title", self.meta_title.as_str()),
            ("document_title", self.document_title.as_str()),
            ("heading", self.heading.as_str()),
            ("rating", self.rating.as_str()),
            ("review_count_meta", self.review_count_meta.as_str()),
            ("description_meta", self.description_meta.as_str()),
            ("review_count_text", self.review_count_text.as_str()),
            ("coordinates", self.coordinates.as_str()),
            ("categories", self.categories.as_str()),
            ("opening_hours", self.opening_hours.as_str()),
        ]
    }
}

mod defaults {
    pub fn meta_title() -> String {
        "meta[property='og:title']".into()
    }
    pub fn document_title() -> String {
        "title".into()
    }
    pub fn heading() -> String {
        "h1.orgpage-header-view__header, h1.business-card-title-view__header, h1".into()
    }
    pub fn rating() -> String {
        "span.business-rating-badge-view__rating-text".into()
    }
    pub fn review_count_meta() -> String {
        "meta[itemprop='reviewCount']".into()
    }
    pub fn description_meta() -> String {
        "meta[property='og:description']".into()
    }
    pub fn review_count_text() -> String {
        "div.business-header-rating-view__text".into()
    }
    pub fn coordinates() -> String {
        "[data-coordinates]".into()
    }
    pub fn coordinates_attr() -> String {
        "data-coordinates".into()
    }
    pub fn categories() -> String {
        "a.orgpage-categories-info-view__link span.button__text".into()
    }
    pub fn opening_hours() -> String {
        "meta[itemprop='openingHours']".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let selectors: ListingSelectors = toml::from_str(r#"rating = "span.score""#).unwrap();
        assert_eq!(selectors.rating, "span.score");
        assert_eq!(selectors.meta_title, "meta[property='og:title']");
    }
}
