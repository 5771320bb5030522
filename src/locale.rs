// src/locale.rs

//! Locale strings and numeral-aware pluralization.

use serde::{Deserialize, Serialize};

use crate::models::Weekday;

/// Plural bucket selected by numeral agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    One,
    Few,
    Many,
}

/// Pick the plural bucket for a count.
///
/// Slavic agreement: 11-14 always take "many", otherwise the last digit
/// decides (1 → one, 2-4 → few, everything else → many).
pub fn plural_category(count: u64) -> PluralCategory {
    let rem100 = count % 100;
    let rem10 = count % 10;

    if (11..=14).contains(&rem100) {
        PluralCategory::Many
    } else if rem10 == 1 {
        PluralCategory::One
    } else if (2..=4).contains(&rem10) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

/// The three agreement forms of a noun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluralNoun {
    pub one: String,
    pub few: String,
    pub many: String,
}

impl PluralNoun {
    pub fn new(one: impl Into<String>, few: impl Into<String>, many: impl Into<String>) -> Self {
        Self {
            one: one.into(),
            few: few.into(),
            many: many.into(),
        }
    }

    /// The form matching `count`.
    pub fn form(&self, count: u64) -> &str {
        match plural_category(count) {
            PluralCategory::One => &self.one,
            PluralCategory::Few => &self.few,
            PluralCategory::Many => &self.many,
        }
    }

    /// Longest prefix shared by all forms, used to spot the noun in free text.
    pub fn stem(&self) -> &str {
        let mut end = self.one.len();
        for other in [&self.few, &self.many] {
            end = self
                .one
                .char_indices()
                .zip(other.chars())
                .take_while(|((_, a), b)| a == b)
                .last()
                .map_or(0, |((i, a), _)| i + a.len_utf8())
                .min(end);
        }
        &self.one[..end]
    }
}

/// Format `count` followed by the agreeing form of `noun`, e.g. "21 отзыв".
pub fn format_count_phrase(noun: &PluralNoun, count: u64) -> String {
    format!("{} {}", count, noun.form(count))
}

/// User-facing strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Noun used for review counts
    #[serde(default = "defaults::review_noun")]
    pub review_noun: PluralNoun,

    /// Day labels, Monday first
    #[serde(default = "defaults::day_labels")]
    pub day_labels: [String; 7],

    /// Hours text for a day without any declaration
    #[serde(default = "defaults::closed_label")]
    pub closed_label: String,

    /// Display placeholders for unresolved fields
    #[serde(default)]
    pub placeholders: Placeholders,

    /// Field captions used when rendering a listing
    #[serde(default)]
    pub labels: FieldLabels,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            review_noun: defaults::review_noun(),
            day_labels: defaults::day_labels(),
            closed_label: defaults::closed_label(),
            placeholders: Placeholders::default(),
            labels: FieldLabels::default(),
        }
    }
}

impl LocaleConfig {
    /// Display label for a day.
    pub fn label(&self, day: Weekday) -> &str {
        &self.day_labels[day.index()]
    }
}

/// Text shown in place of a field the extractor could not resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placeholders {
    #[serde(default = "defaults::title_missing")]
    pub title: String,
    #[serde(default = "defaults::rating_missing")]
    pub rating: String,
    #[serde(default = "defaults::reviews_missing")]
    pub reviews: String,
    #[serde(default = "defaults::coordinates_missing")]
    pub coordinates: String,
    #[serde(default = "defaults::categories_missing")]
    pub categories: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            title: defaults::title_missing(),
            rating: defaults::rating_missing(),
            reviews: defaults::reviews_missing(),
            coordinates: defaults::coordinates_missing(),
            categories: defaults::categories_missing(),
        }
    }
}

/// Captions for rendered listing fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldLabels {
    #[serde(default = "defaults::title_label")]
    pub title: String,
    #[serde(default = "defaults::rating_label")]
    pub rating: String,
    #[serde(default = "defaults::reviews_label")]
    pub reviews: String,
    #[serde(default = "defaults::coordinates_label")]
    pub coordinates: String,
    #[serde(default = "defaults::categories_label")]
    pub categories: String,
    #[serde(default = "defaults::hours_label")]
    pub hours: String,
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self {
            title: defaults::title_label(),
            rating: defaults::rating_label(),
            reviews: defaults::reviews_label(),
            coordinates: defaults::coordinates_label(),
            categories: defaults::categories_label(),
            hours: defaults::hours_label(),
        }
    }
}

mod defaults {
    use super::PluralNoun;

    pub fn review_noun() -> PluralNoun {
        PluralNoun::new("отзыв", "отзыва", "отзывов")
    }
    pub fn day_labels() -> [String; 7] {
        ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"].map(String::from)
    }
    pub fn closed_label() -> String {
        "Не работает".into()
    }
    pub fn title_missing() -> String {
        "Название не найдено".into()
    }
    pub fn rating_missing() -> String {
        "Рейтинг не найден".into()
    }
    pub fn reviews_missing() -> String {
        "Отзывы не найдены".into()
    }
    pub fn coordinates_missing() -> String {
        "Координаты не найдены".into()
    }
    pub fn categories_missing() -> String {
        "Категории не найдены".into()
    }

    pub fn title_label() -> String {
        "Название".into()
    }
    pub fn rating_label() -> String {
        "Рейтинг".into()
    }
    pub fn reviews_label() -> String {
        "Отзывы".into()
    }
    pub fn coordinates_label() -> String {
        "Координаты".into()
    }
    pub fn categories_label() -> String {
        "Категории".into()
    }
    pub fn hours_label() -> String {
        "Часы работы".into()
    }
}
