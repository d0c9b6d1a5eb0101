// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Band range
//!
//! The free-text band selector handed to `aplmap -bandlist` verbatim
//! (`"ALL"`, `"1"`, `"1-5"`, `"1,3,7"`, ...). Kept as an opaque, validated
//! string rather than parsed into a numeric range: the external tools
//! accept their own range grammar and SCOPS never needs to enumerate it,
//! except to extract the `band<N>` tokens an equation references.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ScopsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandRange(String);

fn band_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"band(\d{1,3})").expect("static pattern is valid"))
}

impl BandRange {
    pub fn parse(text: &str) -> Result<Self, ScopsError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ScopsError::InvalidOrderFile("band_range must not be empty".to_string()));
        }
        Ok(BandRange(trimmed.to_string()))
    }

    /// The literal token passed to `aplmap -bandlist`.
    pub fn as_bandlist_arg(&self) -> &str {
        &self.0
    }

    /// Extracts the distinct `band<N>` numbers referenced by a band-math
    /// equation string, in first-seen order, e.g. `"band4/band3"` → `["4",
    /// "3"]`.
    pub fn band_numbers_in_equation(equation: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for capture in band_token_pattern().captures_iter(equation) {
            let number = capture[1].to_string();
            if !seen.contains(&number) {
                seen.push(number);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_and_numeric_ranges() {
        assert_eq!(BandRange::parse("ALL").unwrap().as_bandlist_arg(), "ALL");
        assert_eq!(BandRange::parse("1-5").unwrap().as_bandlist_arg(), "1-5");
    }

    #[test]
    fn rejects_empty_range() {
        assert!(BandRange::parse("   ").is_err());
    }

    #[test]
    fn extracts_band_numbers_from_equation_in_order_without_duplicates() {
        let numbers = BandRange::band_numbers_in_equation("(band4 - band3) / (band4 + band3) + band4");
        assert_eq!(numbers, vec!["4".to_string(), "3".to_string()]);
    }
}
