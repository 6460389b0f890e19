//! # Title Normalization
//!
//! Title handling for the title-keyed merge phase. Two levels of cleanup:
//!
//! - [`normalize_title`] produces the display form: trimmed, control
//!   characters and typographic variants mapped to ASCII, whitespace
//!   collapsed. This matches what the upstream normalization layer does to
//!   titles, so titles that bypassed that layer (e.g. hand-written test
//!   fixtures) still compare equal to loader output.
//!
//! - [`normalize_title_key`] produces the *matching* form used as a merge
//!   key: trailing parenthetical format suffixes such as "(Online)" or
//!   "(En ligne)" stripped, lowercased, punctuation removed, whitespace
//!   collapsed. Two format variants of the same journal normalize to the
//!   same key; two genuinely different titles do not.
//!
//! [`title_identifier`] derives the `TITLE-<hash8>` synthetic identifier
//! from the normalized title for records that end phase 4 with no better
//! identifier.

use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

/// Punctuation stripped from title keys.
const KEY_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '-', '&', '/',
];

fn format_suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Trailing parentheticals are format indicators: (Online), (Print),
    // (En ligne), (CD-ROM), ...
    PATTERN.get_or_init(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("static pattern"))
}

/// Map one character to its cleaned replacement.
///
/// Control characters become spaces, zero-width characters vanish, and the
/// common typographic variants fold to their ASCII equivalents.
fn clean_char(c: char) -> Option<char> {
    match c {
        // C0 and C1 controls, including tab/newline/carriage return
        '\u{00}'..='\u{1f}' | '\u{80}'..='\u{9f}' => Some(' '),
        // Zero-width characters and the replacement character
        '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{feff}' | '\u{fffd}' => None,
        // Apostrophe variants
        '\u{2018}' | '\u{2019}' | '`' | '\u{b4}' | '\u{2032}' => Some('\''),
        // Double quote variants
        '\u{201c}' | '\u{201d}' | '\u{201e}' => Some('"'),
        // En dash
        '\u{2013}' => Some('-'),
        // No-break space
        '\u{a0}' => Some(' '),
        // Soft hyphen (invisible)
        '\u{ad}' => None,
        _ => Some(c),
    }
}

/// Normalize a journal title for display and comparison.
///
/// Returns `None` when nothing survives the cleanup.
pub fn normalize_title(title: &str) -> Option<String> {
    let mut title = title.trim();

    // Wrapping quotes are CSV artifacts
    if title.len() >= 2 && title.starts_with('"') && title.ends_with('"') {
        title = title[1..title.len() - 1].trim();
    }

    let cleaned: String = title.chars().filter_map(clean_char).collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Build a normalized title key for deduplication.
///
/// More aggressive than [`normalize_title`]: strips a trailing
/// parenthetical format suffix, lowercases, and removes punctuation, so
/// "Crohn's and Colitis (Online)" and "Crohn s and Colitis" share a key.
pub fn normalize_title_key(title: &str) -> Option<String> {
    let title = normalize_title(title)?;
    let title = format_suffix_pattern().replace(&title, "");

    let key: String = title
        .to_lowercase()
        .chars()
        .map(|c| if KEY_PUNCTUATION.contains(&c) { ' ' } else { c })
        .collect();
    let key = key.split_whitespace().collect::<Vec<_>>().join(" ");

    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Synthetic identifier from a normalized title: `TITLE-` plus the first
/// 8 hex characters of the title's SHA-256.
pub fn title_identifier(title: &str) -> String {
    let digest = Sha256::digest(title.as_bytes());
    let hash: String = digest
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    format!("TITLE-{hash}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title_trims_and_collapses() {
        assert_eq!(
            normalize_title("  The   Lancet\t ").as_deref(),
            Some("The Lancet")
        );
    }

    #[test]
    fn test_normalize_title_strips_wrapping_quotes() {
        assert_eq!(
            normalize_title("\"Acta Medica\"").as_deref(),
            Some("Acta Medica")
        );
    }

    #[test]
    fn test_normalize_title_maps_typographic_variants() {
        assert_eq!(
            normalize_title("Crohn\u{2019}s and Colitis").as_deref(),
            Some("Crohn's and Colitis")
        );
        assert_eq!(
            normalize_title("Science\u{a0}\u{2013}\u{a0}Advances").as_deref(),
            Some("Science - Advances")
        );
    }

    #[test]
    fn test_normalize_title_removes_control_and_zero_width() {
        assert_eq!(
            normalize_title("Nature\u{200b} Med\u{00}icine").as_deref(),
            Some("Nature Med icine")
        );
    }

    #[test]
    fn test_normalize_title_empty() {
        assert_eq!(normalize_title("   "), None);
        assert_eq!(normalize_title("\u{200b}\u{feff}"), None);
    }

    #[test]
    fn test_title_key_strips_format_suffix_and_punctuation() {
        let a = normalize_title_key("Crohn's and Colitis (Online)").unwrap();
        let b = normalize_title_key("Crohn s and Colitis").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "crohn s and colitis");
    }

    #[test]
    fn test_title_key_distinguishes_different_titles() {
        let a = normalize_title_key("Journal of Botany").unwrap();
        let b = normalize_title_key("Journal of Zoology").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_title_key_only_suffix_left() {
        // A title that is nothing but a parenthetical yields no key
        assert_eq!(normalize_title_key("(Online)"), None);
    }

    #[test]
    fn test_title_identifier_is_stable_and_short() {
        let id = title_identifier("acta medica");
        assert!(id.starts_with("TITLE-"));
        assert_eq!(id.len(), "TITLE-".len() + 8);
        assert_eq!(id, title_identifier("acta medica"));
        assert_ne!(id, title_identifier("acta botanica"));
    }
}
