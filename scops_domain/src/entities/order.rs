// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Order
//!
//! The parsed contents of one order's `.cfg` file: the `DEFAULT`-section
//! fields visible to every section (Python `ConfigParser` inheritance
//! semantics), plus one [`LineRecord`] per flightline section.

use std::collections::BTreeMap;

use crate::value_objects::line_name::LineKey;
use crate::value_objects::order_id::OrderId;
use crate::value_objects::projection::Projection;

use super::line_record::LineRecord;

/// The `DEFAULT`-section submission-readiness flags the intake daemon
/// inspects before handing an order to the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmissionFlags {
    pub submitted: bool,
    pub confirmed: bool,
    pub ftp_dem: bool,
    pub ftp_dem_confirmed: bool,
    pub bandratio: bool,
    pub bandratio_set: bool,
    pub bandratio_mapped_set: bool,
    pub restart: bool,
    pub has_error: bool,
    /// Guards the order-started e-mail so it fires exactly once per order.
    pub status_email_sent: bool,
}

impl SubmissionFlags {
    /// Whether the order is ready for the submitter, per the exact
    /// filter chain the intake daemon runs order-file fields through.
    pub fn is_ready_for_submission(&self) -> bool {
        let mut submit = true;

        if self.ftp_dem {
            submit = false;
            if self.ftp_dem_confirmed {
                submit = true;
            }
        }

        if self.submitted {
            submit = false;
        }

        if !self.confirmed {
            submit = false;
        }

        if self.bandratio && !self.bandratio_set && !self.bandratio_mapped_set {
            submit = false;
        }

        if self.restart {
            submit = true;
        }

        if self.has_error {
            submit = false;
        }

        submit
    }
}

/// One parsed order: `DEFAULT`-section fields plus the per-line table.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub project_code: String,
    pub year: String,
    pub julian_day: String,
    pub sortie: Option<String>,
    pub projection: Projection,
    pub source_folder: String,
    pub output_folder: String,
    /// The declared `dem` field: either `"generated"` (derive from the
    /// flight's mosaic + nav files) or an uploaded path.
    pub dem_source: String,
    pub dem_name: Option<String>,
    pub email: String,
    pub pixel_size: (f64, f64),
    pub interpolation: String,
    /// `aplmap_ignore_freespace`: passes `-ignorediskspace` to `aplmap`.
    pub aplmap_ignore_freespace: bool,
    /// Declared input size in GB, used to size `tmpfree` for cluster
    /// submission; `None` falls back to the 100 GB default.
    pub declared_filesize_gb: Option<f64>,
    pub flags: SubmissionFlags,
    /// `DEFAULT`-section `eq_<name>=<expression>` entries, keyed without
    /// the `eq_` prefix. A line's `eq_<name>` selector enables the
    /// expression of the same name defined here.
    pub equations: BTreeMap<String, String>,
    pub lines: BTreeMap<LineKey, LineRecord>,
}

impl Order {
    /// The lines marked `process=true` or with at least one enabled
    /// `eq_`/`plugin_` selector — the set the submitter fans out.
    pub fn lines_to_process(&self) -> impl Iterator<Item = (&LineKey, &LineRecord)> {
        self.lines.iter().filter(|(_, line)| line.requires_processing())
    }

    /// `1.5 × declared size`, or the 100 GB default when undeclared —
    /// the cluster submitter's `tmpfree` sizing rule.
    pub fn tmpfree_gb(&self) -> f64 {
        self.declared_filesize_gb.map(|gb| 1.5 * gb).unwrap_or(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfirmed_order_is_not_submitted() {
        let flags = SubmissionFlags { confirmed: false, ..Default::default() };
        assert!(!flags.is_ready_for_submission());
    }

    #[test]
    fn already_submitted_order_is_not_resubmitted() {
        let flags = SubmissionFlags { confirmed: true, submitted: true, ..Default::default() };
        assert!(!flags.is_ready_for_submission());
    }

    #[test]
    fn unfinished_bandratio_blocks_submission() {
        let flags = SubmissionFlags { confirmed: true, bandratio: true, ..Default::default() };
        assert!(!flags.is_ready_for_submission());
    }

    #[test]
    fn bandratio_set_allows_submission() {
        let flags = SubmissionFlags { confirmed: true, bandratio: true, bandratio_set: true, ..Default::default() };
        assert!(flags.is_ready_for_submission());
    }

    #[test]
    fn restart_overrides_submitted_flag() {
        let flags = SubmissionFlags { confirmed: true, submitted: true, restart: true, ..Default::default() };
        assert!(flags.is_ready_for_submission());
    }

    #[test]
    fn has_error_always_blocks_submission_even_with_restart() {
        let flags = SubmissionFlags {
            confirmed: true,
            restart: true,
            has_error: true,
            ..Default::default()
        };
        assert!(!flags.is_ready_for_submission());
    }

    #[test]
    fn unconfirmed_ftp_dem_blocks_until_confirmed() {
        let mut flags = SubmissionFlags { confirmed: true, ftp_dem: true, ..Default::default() };
        assert!(!flags.is_ready_for_submission());
        flags.ftp_dem_confirmed = true;
        assert!(flags.is_ready_for_submission());
    }

    fn order(declared_filesize_gb: Option<f64>) -> Order {
        Order {
            id: OrderId::parse("GB25_26_207").unwrap(),
            project_code: "GB25".to_string(),
            year: "26".to_string(),
            julian_day: "207".to_string(),
            sortie: None,
            projection: Projection::Ukbng,
            source_folder: "/data/raw/GB25".to_string(),
            output_folder: "/data/web_processing/GB25_26_207".to_string(),
            dem_source: "generated".to_string(),
            dem_name: None,
            email: "user@example.test".to_string(),
            pixel_size: (2.0, 2.0),
            interpolation: "nearest".to_string(),
            aplmap_ignore_freespace: false,
            declared_filesize_gb,
            flags: SubmissionFlags::default(),
            equations: BTreeMap::new(),
            lines: BTreeMap::new(),
        }
    }

    #[test]
    fn tmpfree_defaults_to_one_hundred_gb_when_undeclared() {
        assert_eq!(order(None).tmpfree_gb(), 100.0);
    }

    #[test]
    fn tmpfree_is_one_and_a_half_times_the_declared_size() {
        assert_eq!(order(Some(10.0)).tmpfree_gb(), 15.0);
    }
}
