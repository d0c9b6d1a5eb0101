// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Stage
//!
//! The canonical sequence of stages a flightline traverses, and the
//! error-absorbing state it can fall into instead. Mirrors the stage
//! column written to the status store and to the per-line status file.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of the four-binary pipeline, or a bookkeeping state around it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    WaitingToProcess,
    AplMask,
    AplCorr,
    AplTran,
    AplMap,
    WaitingToZip,
    Zipping,
    Complete,
    /// Absorbing failure state, e.g. `ERROR - aplmask`.
    Error(String),
}

/// The stage sequence a successful line traverses, in order.
pub const CANONICAL_SEQUENCE: [Stage; 7] = [
    Stage::WaitingToProcess,
    Stage::AplMask,
    Stage::AplCorr,
    Stage::AplTran,
    Stage::AplMap,
    Stage::WaitingToZip,
    Stage::Zipping,
];

impl Stage {
    /// Parses the textual form stored in the database / status file.
    pub fn parse(text: &str) -> Self {
        if let Some(stage) = text.strip_prefix("ERROR - ") {
            return Stage::Error(stage.to_string());
        }
        match text {
            "Waiting to process" => Stage::WaitingToProcess,
            "aplmask" => Stage::AplMask,
            "aplcorr" => Stage::AplCorr,
            "apltran" => Stage::AplTran,
            "aplmap" => Stage::AplMap,
            "waiting to zip" => Stage::WaitingToZip,
            "zipping" => Stage::Zipping,
            "complete" => Stage::Complete,
            other => Stage::Error(format!("unrecognized stage: {other}")),
        }
    }

    /// Renders the textual form written to the database / status file.
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        use std::borrow::Cow;
        match self {
            Stage::WaitingToProcess => Cow::Borrowed("Waiting to process"),
            Stage::AplMask => Cow::Borrowed("aplmask"),
            Stage::AplCorr => Cow::Borrowed("aplcorr"),
            Stage::AplTran => Cow::Borrowed("apltran"),
            Stage::AplMap => Cow::Borrowed("aplmap"),
            Stage::WaitingToZip => Cow::Borrowed("waiting to zip"),
            Stage::Zipping => Cow::Borrowed("zipping"),
            Stage::Complete => Cow::Borrowed("complete"),
            Stage::Error(stage) => Cow::Owned(format!("ERROR - {stage}")),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Stage::Error(_))
    }

    /// Error-stage constructor, e.g. `Stage::error("aplmask")`.
    pub fn error(stage: impl Into<String>) -> Self {
        Stage::Error(stage.into())
    }

    /// Position in [`CANONICAL_SEQUENCE`], used to decide whether a resumed
    /// run should skip a given stage. Returns `None` for `Complete` and
    /// `Error` states, which are not resume points.
    pub fn ordinal(&self) -> Option<usize> {
        CANONICAL_SEQUENCE.iter().position(|s| s == self)
    }

    /// True if `self` comes strictly before `other` in the canonical
    /// sequence (used by the resume logic: skip stages at or before the
    /// stage recorded in the status store).
    pub fn precedes(&self, other: &Stage) -> bool {
        match (self.ordinal(), other.ordinal()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Asserts that a sequence of observed stages is a strict prefix of
/// [`CANONICAL_SEQUENCE`] or ends in exactly one `Error` entry. Used by
/// tests to pin the invariant from spec §8.
pub fn is_valid_stage_trace(trace: &[Stage]) -> bool {
    for (i, stage) in trace.iter().enumerate() {
        if stage.is_error() {
            return i == trace.len() - 1;
        }
        match CANONICAL_SEQUENCE.get(i) {
            Some(expected) if expected == stage => continue,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_through_as_str() {
        for stage in CANONICAL_SEQUENCE.iter().chain([Stage::Complete].iter()) {
            assert_eq!(Stage::parse(&stage.as_str()), *stage);
        }
    }

    #[test]
    fn parse_recognizes_error_prefix() {
        assert_eq!(Stage::parse("ERROR - aplmask"), Stage::error("aplmask"));
        assert!(Stage::parse("ERROR - aplmask").is_error());
    }

    #[test]
    fn canonical_prefix_is_valid() {
        assert!(is_valid_stage_trace(&[Stage::WaitingToProcess, Stage::AplMask, Stage::AplCorr]));
    }

    #[test]
    fn error_terminated_trace_is_valid() {
        assert!(is_valid_stage_trace(&[
            Stage::WaitingToProcess,
            Stage::AplMask,
            Stage::error("aplcorr"),
        ]));
    }

    #[test]
    fn error_in_middle_is_invalid() {
        assert!(!is_valid_stage_trace(&[Stage::error("aplcorr"), Stage::AplTran]));
    }

    #[test]
    fn out_of_order_trace_is_invalid() {
        assert!(!is_valid_stage_trace(&[Stage::AplCorr, Stage::AplMask]));
    }

    #[test]
    fn precedes_orders_the_canonical_sequence() {
        assert!(Stage::AplMask.precedes(&Stage::AplCorr));
        assert!(!Stage::AplCorr.precedes(&Stage::AplMask));
        assert!(!Stage::Complete.precedes(&Stage::AplMask));
    }
}
