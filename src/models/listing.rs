// src/models/listing.rs

//! Listing record and its value types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical weekday, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl Weekday {
    /// The canonical weekly order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Mo,
        Weekday::Tu,
        Weekday::We,
        Weekday::Th,
        Weekday::Fr,
        Weekday::Sa,
        Weekday::Su,
    ];

    /// Two-letter schema.org day code.
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Mo => "Mo",
            Weekday::Tu => "Tu",
            Weekday::We => "We",
            Weekday::Th => "Th",
            Weekday::Fr => "Fr",
            Weekday::Sa => "Sa",
            Weekday::Su => "Su",
        }
    }

    /// Parse a two-letter day code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.code() == code)
    }

    /// Position in the canonical order (Monday = 0).
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Opening hours for the full week.
///
/// Always holds exactly one entry per [`Weekday`]; the only constructor fills
/// every day with a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Weekday, String>", into = "BTreeMap<Weekday, String>")]
pub struct WeeklyHours {
    days: BTreeMap<Weekday, String>,
}

impl WeeklyHours {
    /// Create a schedule with every day set to `sentinel`.
    pub fn filled(sentinel: &str) -> Self {
        let days = Weekday::ALL
            .into_iter()
            .map(|day| (day, sentinel.to_string()))
            .collect();
        Self { days }
    }

    /// Overwrite the hours for a single day.
    pub fn set(&mut self, day: Weekday, hours: impl Into<String>) {
        self.days.insert(day, hours.into());
    }

    /// Hours text for a day.
    pub fn get(&self, day: Weekday) -> &str {
        self.days.get(&day).map(String::as_str).unwrap_or_default()
    }

    /// Iterate days in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &str)> {
        self.days.iter().map(|(day, hours)| (*day, hours.as_str()))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl TryFrom<BTreeMap<Weekday, String>> for WeeklyHours {
    type Error = String;

    fn try_from(days: BTreeMap<Weekday, String>) -> Result<Self, Self::Error> {
        if days.len() != Weekday::ALL.len() {
            return Err(format!("weekly hours need 7 days, got {}", days.len()));
        }
        Ok(Self { days })
    }
}

impl From<WeeklyHours> for BTreeMap<Weekday, String> {
    fn from(hours: WeeklyHours) -> Self {
        hours.days
    }
}

/// Geographic position of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build coordinates from a `"lon,lat"` pair of strings.
    ///
    /// Both axes must parse and fall inside the valid ranges, otherwise the
    /// pair is rejected as a whole.
    pub fn from_lon_lat(lon: &str, lat: &str) -> Option<Self> {
        let longitude: f64 = lon.trim().parse().ok()?;
        let latitude: f64 = lat.trim().parse().ok()?;

        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Structured facts extracted from one listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Cleaned display name
    pub title: Option<String>,

    /// Rating exactly as shown on the page
    pub rating: Option<String>,

    /// Raw review count
    pub review_count: Option<u64>,

    /// Count with the correctly pluralized noun, e.g. "21 отзыв"
    pub review_phrase: Option<String>,

    /// Latitude/longitude pair
    pub coordinates: Option<Coordinates>,

    /// Comma-joined category tags in page order
    pub categories: Option<String>,

    /// Opening hours for all seven days
    pub weekly_hours: WeeklyHours,
}

impl ListingRecord {
    /// An empty record whose schedule is entirely `closed_label`.
    pub fn empty(closed_label: &str) -> Self {
        Self {
            title: None,
            rating: None,
            review_count: None,
            review_phrase: None,
            coordinates: None,
            categories: None,
            weekly_hours: WeeklyHours::filled(closed_label),
        }
    }

    /// Number of optional fields that were resolved.
    pub fn resolved_fields(&self) -> usize {
        [
            self.title.is_some(),
            self.rating.is_some(),
            self.review_count.is_some(),
            self.coordinates.is_some(),
            self.categories.is_some(),
        ]
        .into_iter()
        .filter(|resolved| *resolved)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_codes_roundtrip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_code(day.code()), Some(day));
        }
        assert_eq!(Weekday::from_code("Xx"), None);
        assert_eq!(Weekday::from_code("mo"), None);
    }

    #[test]
    fn test_filled_has_seven_days() {
        let hours = WeeklyHours::filled("closed");
        assert_eq!(hours.len(), 7);
        assert!(hours.iter().all(|(_, h)| h == "closed"));
    }

    #[test]
    fn test_weekly_hours_rejects_partial_map() {
        let mut days = BTreeMap::new();
        days.insert(Weekday::Mo, "09:00-18:00".to_string());
        assert!(WeeklyHours::try_from(days).is_err());
    }

    #[test]
    fn test_weekly_hours_json_shape() {
        let mut hours = WeeklyHours::filled("closed");
        hours.set(Weekday::Sa, "10:00-18:00");
        let json = serde_json::to_value(&hours).unwrap();
        assert_eq!(json["Sa"], "10:00-18:00");
        assert_eq!(json["Mo"], "closed");

        let back: WeeklyHours = serde_json::from_value(json).unwrap();
        assert_eq!(back, hours);
    }

    #[test]
    fn test_coordinates_require_both_axes() {
        assert_eq!(
            Coordinates::from_lon_lat("37.62", "55.75"),
            Some(Coordinates {
                latitude: 55.75,
                longitude: 37.62
            })
        );
        assert!(Coordinates::from_lon_lat("37.62", "").is_none());
        assert!(Coordinates::from_lon_lat("abc", "55.75").is_none());
        assert!(Coordinates::from_lon_lat("37.62", "95.0").is_none());
    }

    #[test]
    fn test_resolved_fields() {
        let mut record = ListingRecord::empty("closed");
        assert_eq!(record.resolved_fields(), 0);
        record.title = Some("Cafe".into());
        record.rating = Some("4.8".into());
        assert_eq!(record.resolved_fields(), 2);
    }
}
