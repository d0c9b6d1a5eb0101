// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Status record
//!
//! Mirrors one row of the `flightlines` table: the durable, queryable
//! record of a single line's progress backing both the operator UI and
//! the pipeline's resume decisions.

use crate::value_objects::file_size::FileSize;
use crate::value_objects::order_id::OrderId;
use crate::value_objects::progress::Progress;
use crate::value_objects::stage::Stage;

#[derive(Debug, Clone)]
pub struct StatusRecord {
    pub processing_id: OrderId,
    pub name: String,
    pub stage: Stage,
    pub progress: Progress,
    pub filesize: FileSize,
    pub zipsize: FileSize,
    /// Set whenever `stage`'s text contains `"ERROR"`.
    pub flag: bool,
    pub link: String,
}

impl StatusRecord {
    pub fn new(processing_id: OrderId, name: impl Into<String>, link: impl Into<String>) -> Self {
        StatusRecord {
            processing_id,
            name: name.into(),
            stage: Stage::WaitingToProcess,
            progress: Progress::zero(),
            filesize: FileSize::zero(),
            zipsize: FileSize::zero(),
            flag: false,
            link: link.into(),
        }
    }

    /// Transitions to `stage`, setting the error flag whenever the new
    /// stage's text mentions `"ERROR"` — matches `update_stage`'s
    /// substring check.
    pub fn transition_to(&mut self, stage: Stage) {
        self.flag = stage.is_error();
        self.stage = stage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> StatusRecord {
        StatusRecord::new(OrderId::parse("GB25_26_207").unwrap(), "f123", "http://example.test/f123")
    }

    #[test]
    fn new_record_starts_waiting_with_no_error() {
        let record = record();
        assert_eq!(record.stage, Stage::WaitingToProcess);
        assert!(!record.flag);
    }

    #[test]
    fn transitioning_to_an_error_stage_sets_the_flag() {
        let mut record = record();
        record.transition_to(Stage::error("aplmask"));
        assert!(record.flag);
    }

    #[test]
    fn transitioning_to_a_normal_stage_clears_the_flag() {
        let mut record = record();
        record.transition_to(Stage::error("aplmask"));
        record.transition_to(Stage::AplCorr);
        assert!(!record.flag);
    }
}
