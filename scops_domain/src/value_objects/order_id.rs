// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Order id
//!
//! The synthetic identifier assigned to a workspace folder at submission
//! time: `<project>_<year>_<jday>[<sortie>]<YYYYMMDDhhmmss>`. Also the
//! primary key column (`processing_id`) of every status-store row for the
//! order's lines.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ScopsError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    /// Builds an id from its parts, matching the original folder-naming
    /// convention. `sortie` is appended before the timestamp when present.
    pub fn new(project_code: &str, year: &str, julian_day: u16, sortie: Option<&str>, timestamp: NaiveDateTime) -> Self {
        let jday = format!("{julian_day:03}");
        let sortie_part = sortie.unwrap_or("");
        let stamp = timestamp.format("%Y%m%d%H%M%S");
        OrderId(format!("{project_code}_{year}_{jday}{sortie_part}{stamp}"))
    }

    /// Accepts any non-empty identifier already assigned, e.g. when
    /// resuming a workspace whose directory name is the order id.
    pub fn parse(text: &str) -> Result<Self, ScopsError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ScopsError::InvalidOrderFile("order id must not be empty".to_string()));
        }
        Ok(OrderId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn builds_id_from_parts() {
        let stamp = NaiveDate::from_ymd_opt(2026, 7, 26).unwrap().and_hms_opt(14, 30, 0).unwrap();
        let id = OrderId::new("GB25", "26", 207, None, stamp);
        assert_eq!(id.as_str(), "GB25_26_20720260726143000");
    }

    #[test]
    fn builds_id_with_sortie_inserted_before_timestamp() {
        let stamp = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let id = OrderId::new("GB25", "26", 5, Some("a"), stamp);
        assert_eq!(id.as_str(), "GB25_26_005a20260105000000");
    }

    #[test]
    fn parse_rejects_empty_ids() {
        assert!(OrderId::parse("  ").is_err());
    }

    #[test]
    fn parse_accepts_existing_ids_verbatim() {
        assert_eq!(OrderId::parse("GB25_26_20720260726143000").unwrap().as_str(), "GB25_26_20720260726143000");
    }
}
