// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Processing events
//!
//! Significant occurrences during one line's run, raised by the pipeline
//! driver for logging and, eventually, notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::order_id::OrderId;
use crate::value_objects::stage::Stage;

/// One line's lifecycle events, in the order the driver can raise them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProcessingEvent {
    OrderStarted { order_id: OrderId, occurred_at: DateTime<Utc> },
    LineStageEntered { order_id: OrderId, line: String, stage: Stage, occurred_at: DateTime<Utc> },
    LineStageFailed { order_id: OrderId, line: String, stage: Stage, detail: String, occurred_at: DateTime<Utc> },
    PreprocessingErrorRaised { order_id: OrderId, line: String, detail: String, occurred_at: DateTime<Utc> },
    OrderCompleted { order_id: OrderId, occurred_at: DateTime<Utc> },
}

impl ProcessingEvent {
    pub fn order_id(&self) -> &OrderId {
        match self {
            ProcessingEvent::OrderStarted { order_id, .. }
            | ProcessingEvent::LineStageEntered { order_id, .. }
            | ProcessingEvent::LineStageFailed { order_id, .. }
            | ProcessingEvent::PreprocessingErrorRaised { order_id, .. }
            | ProcessingEvent::OrderCompleted { order_id, .. } => order_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn order_id_is_extracted_from_every_variant() {
        let id = OrderId::parse("GB25_26_207").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 7, 26, 12, 0, 0).unwrap();
        let event = ProcessingEvent::LineStageFailed {
            order_id: id.clone(),
            line: "f123".to_string(),
            stage: Stage::error("aplmask"),
            detail: "no output produced".to_string(),
            occurred_at: now,
        };
        assert_eq!(event.order_id().as_str(), id.as_str());
    }
}
