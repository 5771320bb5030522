// src/services/schedule.rs

//! Opening-hours normalization.
//!
//! Listing pages publish hours as schema.org `openingHours` strings such as
//! `"Mo-Fr 09:00-21:00"` or `"Sa,Su 10:00-18:00"`. This module expands the
//! day codes and folds all declarations into a full seven-day schedule.

use crate::models::{WeeklyHours, Weekday};

/// One raw `"<days> <hours>"` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDeclaration {
    pub days: String,
    pub hours: String,
}

impl ScheduleDeclaration {
    /// Split a declaration at its first whitespace.
    ///
    /// Returns `None` when either half is missing.
    pub fn parse(content: &str) -> Option<Self> {
        let (days, hours) = content.trim().split_once(char::is_whitespace)?;
        let hours = hours.trim();
        if days.is_empty() || hours.is_empty() {
            return None;
        }
        Some(Self {
            days: days.to_string(),
            hours: hours.to_string(),
        })
    }
}

/// Expand a day-code group into weekdays.
///
/// The group may list codes separated by commas (`"Sa,Su"`) and each code may
/// be a range (`"Mo-Fr"`). Ranges walk the canonical order and wrap past
/// Sunday, so `"Fr-Mo"` yields Fr, Sa, Su, Mo. Unknown codes are dropped.
pub fn expand_day_codes(group: &str) -> Vec<Weekday> {
    group
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .flat_map(expand_chunk)
        .collect()
}

fn expand_chunk(chunk: &str) -> Vec<Weekday> {
    let Some((start, end)) = chunk.split_once('-') else {
        return Weekday::from_code(chunk).into_iter().collect();
    };

    let (Some(start), Some(end)) = (Weekday::from_code(start), Weekday::from_code(end)) else {
        return Vec::new();
    };

    let span = (end.index() + 7 - start.index()) % 7;
    (0..=span)
        .map(|offset| Weekday::ALL[(start.index() + offset) % 7])
        .collect()
}

/// Fold declarations into a seven-day schedule.
///
/// Days without a declaration keep `closed_label`. Declarations apply in
/// order, so a later one overwrites an earlier one for the same day.
pub fn normalize(declarations: &[ScheduleDeclaration], closed_label: &str) -> WeeklyHours {
    let mut hours = WeeklyHours::filled(closed_label);

    for declaration in declarations {
        for day in expand_day_codes(&declaration.days) {
            hours.set(day, declaration.hours.as_str());
        }
    }

    hours
}

/// Parse raw declaration strings and normalize them, skipping malformed ones.
pub fn normalize_raw<'a>(
    raw: impl IntoIterator<Item = &'a str>,
    closed_label: &str,
) -> WeeklyHours {
    let declarations: Vec<_> = raw
        .into_iter()
        .filter_map(|content| {
            let parsed = ScheduleDeclaration::parse(content);
            if parsed.is_none() {
                log::debug!("Skipping malformed opening hours declaration: {content:?}");
            }
            parsed
        })
        .collect();
    normalize(&declarations, closed_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Weekday::*;

    const CLOSED: &str = "closed";

    fn decl(days: &str, hours: &str) -> ScheduleDeclaration {
        ScheduleDeclaration {
            days: days.into(),
            hours: hours.into(),
        }
    }

    #[test]
    fn test_parse_declaration() {
        assert_eq!(
            ScheduleDeclaration::parse("Mo-Fr 09:00-21:00"),
            Some(decl("Mo-Fr", "09:00-21:00"))
        );
        assert_eq!(ScheduleDeclaration::parse(""), None);
        assert_eq!(ScheduleDeclaration::parse("Mo-Fr"), None);
        assert_eq!(ScheduleDeclaration::parse("Mo-Fr   "), None);
    }

    #[test]
    fn test_expand_single_and_list() {
        assert_eq!(expand_day_codes("We"), vec![We]);
        assert_eq!(expand_day_codes("Sa,Su"), vec![Sa, Su]);
        assert_eq!(expand_day_codes("Mo,We-Fr"), vec![Mo, We, Th, Fr]);
    }

    #[test]
    fn test_expand_wrapping_range() {
        assert_eq!(expand_day_codes("We-Mo"), vec![We, Th, Fr, Sa, Su, Mo]);
        assert_eq!(expand_day_codes("Su-Tu"), vec![Su, Mo, Tu]);
        assert_eq!(expand_day_codes("Tu-Tu"), vec![Tu]);
    }

    #[test]
    fn test_expand_drops_unknown_codes() {
        assert!(expand_day_codes("Xx").is_empty());
        assert!(expand_day_codes("Mo-Xx").is_empty());
        assert_eq!(expand_day_codes("Xx,Fr"), vec![Fr]);
    }

    #[test]
    fn test_empty_input_has_seven_closed_days() {
        let hours = normalize(&[], CLOSED);
        assert_eq!(hours.len(), 7);
        assert!(hours.iter().all(|(_, h)| h == CLOSED));
    }

    #[test]
    fn test_weekday_and_weekend_declarations() {
        let hours = normalize(
            &[decl("Mo-Fr", "09:00-21:00"), decl("Sa,Su", "10:00-18:00")],
            CLOSED,
        );
        for day in [Mo, Tu, We, Th, Fr] {
            assert_eq!(hours.get(day), "09:00-21:00");
        }
        assert_eq!(hours.get(Sa), "10:00-18:00");
        assert_eq!(hours.get(Su), "10:00-18:00");
    }

    #[test]
    fn test_last_declaration_wins() {
        let hours = normalize(
            &[decl("Mo-Su", "10:00-22:00"), decl("Fr", "10:00-02:00")],
            CLOSED,
        );
        assert_eq!(hours.get(Fr), "10:00-02:00");
        assert_eq!(hours.get(Th), "10:00-22:00");
    }

    #[test]
    fn test_normalize_raw_skips_malformed() {
        let hours = normalize_raw(["Mo 10:00-20:00", "garbage", "", "Xx 01:00-02:00"], CLOSED);
        assert_eq!(hours.len(), 7);
        assert_eq!(hours.get(Mo), "10:00-20:00");
        assert_eq!(hours.get(Tu), CLOSED);
    }
}
