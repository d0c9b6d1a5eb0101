// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Masking policy
//!
//! Parses the order's `masking` field (the letter alphabet
//! `{a,b,c,d,e,f,u,o,m,n,r,q}`, or the literals `all`/`none`) into the
//! numeric flag set and CCD letter set passed to `aplmask`. Sets rather
//! than ordered lists: the binary treats repeated or differently-ordered
//! letters identically, so the policy is compared and hashed as a set.

use std::collections::BTreeSet;

use crate::error::ScopsError;

/// CCD letters a–f all derive from numeric flag `"4"` in addition to their
/// own per-letter numeric code.
const CCD_LETTERS: &str = "abcdef";

fn numeric_code(letter: char) -> Option<&'static str> {
    match letter {
        'a' => Some("A"),
        'b' => Some("B"),
        'c' => Some("C"),
        'd' => Some("D"),
        'e' => Some("E"),
        'f' => Some("F"),
        'u' => Some("1"),
        'o' => Some("2"),
        'm' => Some("8"),
        'n' => Some("16"),
        'r' => Some("32"),
        'q' => Some("64"),
        _ => None,
    }
}

/// Resolved masking instruction for one flightline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskingPolicy {
    /// Skip stage 1 entirely and treat the input level-1 file as masked.
    None,
    /// Invoke `aplmask` with no `-flags` and no `-onlymaskmethods`.
    All,
    /// Invoke `aplmask -flags <numeric_flags> [-onlymaskmethods <ccd_letters>]`.
    Selective {
        numeric_flags: BTreeSet<&'static str>,
        ccd_letters: BTreeSet<char>,
    },
}

impl MaskingPolicy {
    /// Parses the order file's `masking` field.
    pub fn parse(text: &str) -> Result<Self, ScopsError> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("none") {
            return Ok(MaskingPolicy::None);
        }
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(MaskingPolicy::All);
        }
        let mut numeric_flags = BTreeSet::new();
        let mut ccd_letters = BTreeSet::new();
        for ch in trimmed.chars() {
            let lower = ch.to_ascii_lowercase();
            let code = numeric_code(lower)
                .ok_or_else(|| ScopsError::InvalidOrderFile(format!("unrecognized masking letter: {ch}")))?;
            if CCD_LETTERS.contains(lower) {
                numeric_flags.insert("4");
                ccd_letters.insert(lower.to_ascii_uppercase());
            } else {
                numeric_flags.insert(code);
            }
        }
        Ok(MaskingPolicy::Selective { numeric_flags, ccd_letters })
    }

    pub fn skips_masking_stage(&self) -> bool {
        matches!(self, MaskingPolicy::None)
    }

    /// Whether the policy wants `-onlymaskmethods` passed, contingent on the
    /// bad-pixel-method mask file existing on disk (checked by the caller).
    pub fn wants_only_mask_methods(&self) -> bool {
        matches!(self, MaskingPolicy::Selective { ccd_letters, .. } if !ccd_letters.is_empty())
    }

    /// The `-flags` values, empty for `all`/`none`.
    pub fn numeric_flags(&self) -> BTreeSet<&'static str> {
        match self {
            MaskingPolicy::Selective { numeric_flags, .. } => numeric_flags.clone(),
            MaskingPolicy::All | MaskingPolicy::None => BTreeSet::new(),
        }
    }

    /// The `-onlymaskmethods` CCD letters, empty for `all`/`none`.
    pub fn ccd_letters(&self) -> BTreeSet<char> {
        match self {
            MaskingPolicy::Selective { ccd_letters, .. } => ccd_letters.clone(),
            MaskingPolicy::All | MaskingPolicy::None => BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_skips_masking() {
        assert!(MaskingPolicy::parse("none").unwrap().skips_masking_stage());
    }

    #[test]
    fn all_is_unconditional() {
        assert_eq!(MaskingPolicy::parse("all").unwrap(), MaskingPolicy::All);
    }

    #[test]
    fn ccd_letters_derive_flag_four() {
        let policy = MaskingPolicy::parse("ab").unwrap();
        match policy {
            MaskingPolicy::Selective { numeric_flags, ccd_letters } => {
                assert_eq!(numeric_flags, BTreeSet::from(["4"]));
                assert_eq!(ccd_letters, BTreeSet::from(['A', 'B']));
            }
            _ => panic!("expected selective policy"),
        }
    }

    #[test]
    fn non_ccd_letters_use_their_own_numeric_code() {
        let policy = MaskingPolicy::parse("uo").unwrap();
        match policy {
            MaskingPolicy::Selective { numeric_flags, ccd_letters } => {
                assert_eq!(numeric_flags, BTreeSet::from(["1", "2"]));
                assert!(ccd_letters.is_empty());
            }
            _ => panic!("expected selective policy"),
        }
    }

    #[test]
    fn policy_is_order_independent() {
        assert_eq!(MaskingPolicy::parse("ab").unwrap(), MaskingPolicy::parse("ba").unwrap());
        assert_eq!(MaskingPolicy::parse("aab").unwrap(), MaskingPolicy::parse("ab").unwrap());
    }

    #[test]
    fn unrecognized_letter_is_rejected() {
        assert!(MaskingPolicy::parse("z").is_err());
    }

    #[test]
    fn only_mask_methods_requires_ccd_letters() {
        assert!(!MaskingPolicy::parse("uo").unwrap().wants_only_mask_methods());
        assert!(MaskingPolicy::parse("a").unwrap().wants_only_mask_methods());
    }
}
