// src/services/fields.rs

//! Field extraction rules for listing pages.
//!
//! Every field has its own priority-ordered list of lookups. The first lookup
//! producing a non-empty value wins; when all of them miss, the field is left
//! as `None`. Fields never depend on each other.

use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::locale::{PluralNoun, format_count_phrase};
use crate::models::{Config, Coordinates, ListingRecord, ListingSelectors, WeeklyHours};
use crate::services::fetch::FetchedPage;
use crate::services::schedule;

/// Compiled CSS selectors.
struct CompiledSelectors {
    meta_title: Selector,
    document_title: Selector,
    heading: Selector,
    rating: Selector,
    review_count_meta: Selector,
    description_meta: Selector,
    review_count_text: Selector,
    coordinates: Selector,
    categories: Selector,
    opening_hours: Selector,
}

impl CompiledSelectors {
    fn compile(selectors: &ListingSelectors) -> Result<Self> {
        Ok(Self {
            meta_title: parse_selector(&selectors.meta_title)?,
            document_title: parse_selector(&selectors.document_title)?,
            heading: parse_selector(&selectors.heading)?,
            rating: parse_selector(&selectors.rating)?,
            review_count_meta: parse_selector(&selectors.review_count_meta)?,
            description_meta: parse_selector(&selectors.description_meta)?,
            review_count_text: parse_selector(&selectors.review_count_text)?,
            coordinates: parse_selector(&selectors.coordinates)?,
            categories: parse_selector(&selectors.categories)?,
            opening_hours: parse_selector(&selectors.opening_hours)?,
        })
    }
}

/// Parse a CSS selector, mapping failures to [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Extracts a [`ListingRecord`] from fetched markup.
pub struct FieldExtractor {
    selectors: CompiledSelectors,
    coordinates_attr: String,
    brand_suffix: Regex,
    review_mention: Regex,
    coordinates_markup: Regex,
    digits: Regex,
    review_noun: PluralNoun,
    closed_label: String,
}

impl FieldExtractor {
    /// Compile selectors and patterns from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let selectors = CompiledSelectors::compile(&config.selectors)?;
        let brand_suffix = Regex::new(&config.cleaning.brand_suffix_pattern)?;

        let stem = config.locale.review_noun.stem();
        if stem.is_empty() {
            return Err(AppError::config(
                "locale.review_noun forms share no common stem",
            ));
        }
        let review_mention = RegexBuilder::new(&format!(r"(\d+)\s+{}", regex::escape(stem)))
            .case_insensitive(true)
            .build()?;

        let coordinates_markup = Regex::new(&format!(
            r#"{}="([\-0-9.]+),([\-0-9.]+)""#,
            regex::escape(&config.selectors.coordinates_attr)
        ))?;

        Ok(Self {
            selectors,
            coordinates_attr: config.selectors.coordinates_attr.clone(),
            brand_suffix,
            review_mention,
            coordinates_markup,
            digits: Regex::new(r"\d+")?,
            review_noun: config.locale.review_noun.clone(),
            closed_label: config.locale.closed_label.clone(),
        })
    }

    /// Run every field rule over the page.
    pub fn extract(&self, page: &FetchedPage) -> ListingRecord {
        let document = Html::parse_document(&page.html);

        let review_count = self.review_count(&document);
        let record = ListingRecord {
            title: self.title(&document),
            rating: self.rating(&document),
            review_count,
            review_phrase: review_count.map(|n| format_count_phrase(&self.review_noun, n)),
            coordinates: self.coordinates(&document, &page.html, &page.final_url),
            categories: self.categories(&document),
            weekly_hours: self.weekly_hours(&document),
        };

        log::debug!(
            "Resolved {}/5 fields from {} ({:?})",
            record.resolved_fields(),
            page.final_url,
            page.strategy
        );
        record
    }

    /// Title: page metadata, then the title tag, then a heading.
    pub fn title(&self, document: &Html) -> Option<String> {
        first_attr(document, &self.selectors.meta_title, "content")
            .and_then(|raw| self.clean_title(&raw))
            .or_else(|| {
                first_text(document, &self.selectors.document_title)
                    .and_then(|raw| self.clean_title(&raw))
            })
            .or_else(|| first_text(document, &self.selectors.heading))
    }

    /// Page title as published, with only the site branding removed.
    ///
    /// Used for challenge detection, which must see the full text rather than
    /// the first comma segment kept by [`Self::title`].
    pub fn raw_title(&self, document: &Html) -> Option<String> {
        first_attr(document, &self.selectors.meta_title, "content")
            .or_else(|| first_text(document, &self.selectors.document_title))
            .and_then(|raw| {
                let text = normalize_whitespace(&raw);
                non_empty(self.brand_suffix.replace(&text, "").trim())
            })
    }

    /// Strip the site branding and keep the name before the first comma.
    pub fn clean_title(&self, raw: &str) -> Option<String> {
        let text = normalize_whitespace(raw);
        let text = self.brand_suffix.replace(&text, "");
        let head = text.split(',').next().unwrap_or_default().trim();
        let cleaned = if head.is_empty() { text.trim() } else { head };
        non_empty(cleaned)
    }

    /// Rating badge text. Single lookup.
    pub fn rating(&self, document: &Html) -> Option<String> {
        first_text(document, &self.selectors.rating)
    }

    /// Review count: structured metadata, then the description, then the
    /// visible counter.
    pub fn review_count(&self, document: &Html) -> Option<u64> {
        first_attr(document, &self.selectors.review_count_meta, "content")
            .and_then(|raw| raw.trim().parse().ok())
            .or_else(|| {
                first_attr(document, &self.selectors.description_meta, "content").and_then(
                    |text| {
                        self.review_mention
                            .captures(&text)
                            .and_then(|caps| caps[1].parse().ok())
                    },
                )
            })
            .or_else(|| {
                first_text(document, &self.selectors.review_count_text).and_then(|text| {
                    self.digits
                        .find(&text)
                        .and_then(|m| m.as_str().parse().ok())
                })
            })
    }

    /// Coordinates from the attribute, the raw markup, or the `ll` query
    /// parameter of the final URL. A source must yield both axes.
    pub fn coordinates(&self, document: &Html, html: &str, final_url: &str) -> Option<Coordinates> {
        self.coordinates_from_attr(document)
            .or_else(|| self.coordinates_from_markup(html))
            .or_else(|| coordinates_from_url(final_url))
    }

    fn coordinates_from_attr(&self, document: &Html) -> Option<Coordinates> {
        document
            .select(&self.selectors.coordinates)
            .find_map(|el| el.value().attr(&self.coordinates_attr))
            .and_then(parse_lon_lat)
    }

    fn coordinates_from_markup(&self, html: &str) -> Option<Coordinates> {
        self.coordinates_markup
            .captures_iter(html)
            .find_map(|caps| Coordinates::from_lon_lat(&caps[1], &caps[2]))
    }

    /// Category labels joined in page order.
    pub fn categories(&self, document: &Html) -> Option<String> {
        let parts: Vec<String> = document
            .select(&self.selectors.categories)
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Weekly schedule from opening-hours metadata.
    pub fn weekly_hours(&self, document: &Html) -> WeeklyHours {
        let declarations = document
            .select(&self.selectors.opening_hours)
            .filter_map(|el| el.value().attr("content"));
        schedule::normalize_raw(declarations, &self.closed_label)
    }
}

/// Parse `"lon,lat"`.
fn parse_lon_lat(raw: &str) -> Option<Coordinates> {
    let (lon, lat) = raw.split_once(',')?;
    Coordinates::from_lon_lat(lon, lat)
}

/// Coordinates from the `ll=lon,lat` query parameter.
pub fn coordinates_from_url(url: &str) -> Option<Coordinates> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "ll")
        .and_then(|(_, value)| parse_lon_lat(&value))
}

fn first_attr(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .find_map(|el| el.value().attr(attr))
        .and_then(|value| non_empty(value.trim()))
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(|el| element_text(&el))
        .find(|text| !text.is_empty())
}

fn element_text(el: &ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
