//! Shared text and number helpers for the IDF equation service

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Normalize a place name for matching
///
/// Municipality and station names in the workbook are typed by hand and
/// frequently disagree with user input on accents, spacing and case. Two names
/// refer to the same place iff their normalized forms are equal: combining
/// diacritics (U+0300..U+036F) are dropped after NFD decomposition, runs of
/// whitespace collapse to a single space, and the result is trimmed and
/// lowercased.
///
/// # Examples
///
/// ```
/// use idf_equation_service::utils::normalize_text;
///
/// assert_eq!(normalize_text("São Paulo"), "sao paulo");
/// assert_eq!(normalize_text(" SAO   PAULO "), "sao paulo");
/// assert_eq!(normalize_text("Brasília\tDF"), "brasilia df");
/// ```
pub fn normalize_text(value: &str) -> String {
    let stripped: String = value
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();

    WHITESPACE
        .replace_all(&stripped, " ")
        .trim()
        .to_lowercase()
}

/// Parse a coefficient written with either decimal separator
///
/// Brazilian sources mix `1,234` and `1.234`; only the first comma is
/// treated as a decimal separator. A lone dash or blank means "no value", as
/// does anything that does not parse to a finite number.
///
/// # Examples
///
/// ```
/// use idf_equation_service::utils::parse_decimal;
///
/// assert_eq!(parse_decimal("0,171"), Some(0.171));
/// assert_eq!(parse_decimal(" 12.5 "), Some(12.5));
/// assert_eq!(parse_decimal("-"), None);
/// assert_eq!(parse_decimal("n/d"), None);
/// ```
pub fn parse_decimal(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }

    trimmed
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Round to a fixed number of decimal places for presentation
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
