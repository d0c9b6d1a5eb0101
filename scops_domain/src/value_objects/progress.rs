// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Progress
//!
//! Translates a stage plus an internal tool-reported percent into the
//! single 0-100 number shown to the operator, per the baseline/weight
//! table the progress watcher uses.

use crate::value_objects::stage::Stage;

/// A value in `0..=100`, clamped at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Progress(u8);

impl Progress {
    pub fn new(value: u8) -> Self {
        Progress(value.min(100))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn zero() -> Self {
        Progress(0)
    }

    pub fn complete() -> Self {
        Progress(100)
    }

    /// True if `self` is not smaller than `previous` — the invariant a
    /// single stage's progress reports must hold.
    pub fn is_monotonic_from(self, previous: Progress) -> bool {
        self.0 >= previous.0
    }
}

/// `(baseline, weight)` contribution of a stage to overall 0-100 progress.
/// `None` for stages with no log-tail percent to translate (waiting states).
fn baseline_and_weight(stage: &Stage) -> Option<(f64, f64)> {
    match stage {
        Stage::AplMask => Some((0.0, 15.0)),
        Stage::AplCorr => Some((15.0, 15.0)),
        Stage::AplTran => Some((30.0, 15.0)),
        Stage::AplMap => Some((45.0, 50.0)),
        Stage::WaitingToZip | Stage::Zipping => Some((95.0, 5.0)),
        _ => None,
    }
}

/// Computes overall progress from a stage and the tool's self-reported
/// internal percent (`0..=100`). `Stage::Complete` always yields 100
/// regardless of the internal percent.
pub fn overall_progress(stage: &Stage, internal_percent: u8) -> Progress {
    if matches!(stage, Stage::Complete) {
        return Progress::complete();
    }
    match baseline_and_weight(stage) {
        Some((baseline, weight)) => {
            let value = baseline + (internal_percent.min(100) as f64 / 100.0) * weight;
            Progress::new(value.round() as u8)
        }
        None => Progress::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aplmap_at_fifty_percent_is_seventy() {
        assert_eq!(overall_progress(&Stage::AplMap, 50).value(), 70);
    }

    #[test]
    fn complete_is_always_a_hundred() {
        assert_eq!(overall_progress(&Stage::Complete, 0).value(), 100);
        assert_eq!(overall_progress(&Stage::Complete, 37).value(), 100);
    }

    #[test]
    fn waiting_to_process_has_no_baseline() {
        assert_eq!(overall_progress(&Stage::WaitingToProcess, 80).value(), 0);
    }

    #[test]
    fn zipping_baseline_is_ninety_five() {
        assert_eq!(overall_progress(&Stage::Zipping, 0).value(), 95);
        assert_eq!(overall_progress(&Stage::Zipping, 100).value(), 100);
    }

    #[test]
    fn new_clamps_above_100() {
        assert_eq!(Progress::new(255).value(), 100);
    }

    #[test]
    fn monotonicity_check() {
        assert!(Progress::new(50).is_monotonic_from(Progress::new(30)));
        assert!(!Progress::new(20).is_monotonic_from(Progress::new(30)));
    }
}
