// src/services/fetch/challenge.rs

//! Anti-automation challenge detection for plain HTTP responses.
//!
//! The heuristics are tuned to the current site: a challenge page either has
//! an unusually long title, a title that decoded into mojibake, or a known
//! marker in its title or URL.

use unicode_segmentation::UnicodeSegmentation;

use crate::models::FetchConfig;

/// Characters typical of UTF-8 Cyrillic read as Latin-1.
const MOJIBAKE_MARKERS: [char; 5] = ['Ð', 'Ñ', 'Ã', 'Â', 'â'];
const MOJIBAKE_THRESHOLD: usize = 3;

/// Classifies lightweight responses as challenge pages.
#[derive(Debug, Clone)]
pub struct ChallengeDetector {
    max_title_graphemes: usize,
    markers: Vec<String>,
}

impl ChallengeDetector {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            max_title_graphemes: config.max_title_graphemes,
            markers: config
                .challenge_markers
                .iter()
                .map(|m| m.to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// Return the reason a page looks like a challenge, if it does.
    pub fn inspect(&self, title: Option<&str>, final_url: &str) -> Option<String> {
        let url_lower = final_url.to_lowercase();
        if let Some(marker) = self.markers.iter().find(|m| url_lower.contains(m.as_str())) {
            return Some(format!("challenge marker '{marker}' in URL"));
        }

        let title = title?;

        let length = title.graphemes(true).count();
        if length > self.max_title_graphemes {
            return Some(format!(
                "title is {length} characters long (limit {})",
                self.max_title_graphemes
            ));
        }

        if is_garbled(title) {
            return Some("title looks mis-encoded".to_string());
        }

        let title_lower = title.to_lowercase();
        self.markers
            .iter()
            .find(|m| title_lower.contains(m.as_str()))
            .map(|marker| format!("challenge marker '{marker}' in title"))
    }
}

/// Whether text looks like it was decoded with the wrong charset.
///
/// Covers UTF-8 read as Latin-1 (`ÐÐ°Ñ...`) and UTF-8 Cyrillic read as
/// cp1251 (`РљР°С„Рµ...`).
pub fn is_garbled(text: &str) -> bool {
    if text.contains(char::REPLACEMENT_CHARACTER) {
        return true;
    }
    let markers = text
        .chars()
        .filter(|c| MOJIBAKE_MARKERS.contains(c))
        .count();
    markers >= MOJIBAKE_THRESHOLD || cp1251_pairs(text) >= MOJIBAKE_THRESHOLD
}

/// Count `Р`/`С` followed by a character that a UTF-8 continuation byte
/// becomes under cp1251. Russian text never produces these pairs.
fn cp1251_pairs(text: &str) -> usize {
    let chars: Vec<char> = text.chars().collect();
    chars
        .windows(2)
        .filter(|pair| matches!(pair[0], 'Р' | 'С') && is_cp1251_continuation(pair[1]))
        .count()
}

fn is_cp1251_continuation(c: char) -> bool {
    matches!(c,
        '\u{00a0}'..='\u{00bf}'
        | '\u{0400}'..='\u{040f}'
        | '\u{0450}'..='\u{045f}'
        | '\u{0490}'..='\u{0491}'
        | '\u{2010}'..='\u{203a}'
        | '\u{20ac}'
        | '\u{2116}'
        | '\u{2122}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ChallengeDetector {
        ChallengeDetector::new(&FetchConfig::default())
    }

    #[test]
    fn test_normal_title_passes() {
        assert_eq!(
            detector().inspect(Some("Кафе Пушкинъ"), "https://yandex.ru/maps/org/1/"),
            None
        );
    }

    #[test]
    fn test_missing_title_passes() {
        assert_eq!(detector().inspect(None, "https://yandex.ru/maps/org/1/"), None);
    }

    #[test]
    fn test_long_title_blocked() {
        let title = "Кафе".repeat(20);
        let reason = detector()
            .inspect(Some(&title), "https://yandex.ru/maps/org/1/")
            .unwrap();
        assert!(reason.contains("80 characters"));
    }

    #[test]
    fn test_mojibake_blocked() {
        assert!(is_garbled("ÐÐ°ÑÐµ"));
        assert!(is_garbled("Caf\u{fffd}"));
        assert!(!is_garbled("Café Ñandú"));
        assert!(
            detector()
                .inspect(Some("ÐÐ¾ÑÐºÐ²Ð°"), "https://yandex.ru/maps/org/1/")
                .is_some()
        );
    }

    #[test]
    fn test_cp1251_mojibake_blocked() {
        assert!(is_garbled("РљР°С„Рµ"));
        assert!(is_garbled("РџСѓС€РєРёРЅСЉ, СЂРµСЃС‚РѕСЂР°РЅ"));
        assert!(!is_garbled("Ресторан Россия, Садовая улица"));
        assert!(!is_garbled("Сёмга и Рёко"));
    }

    #[test]
    fn test_long_title_with_commas_blocked() {
        let title = "РљР°С„Рµ РџСѓС€РєРёРЅСЉ, СЂРµСЃС‚РѕСЂР°РЅ, РўРІРµСЂСЃРєРѕР№ Р±СѓР»СЊРІР°СЂ, 26Рђ";
        assert_eq!(title.chars().count(), 80);
        assert!(
            detector()
                .inspect(Some(title), "https://yandex.ru/maps/org/1/")
                .is_some()
        );
    }

    #[test]
    fn test_marker_in_url_or_title() {
        let d = detector();
        assert!(
            d.inspect(Some("Кафе"), "https://yandex.ru/showcaptcha?retpath=x")
                .is_some()
        );
        assert!(
            d.inspect(Some("Вы не робот?"), "https://yandex.ru/maps/org/1/")
                .is_some()
        );
    }
}
