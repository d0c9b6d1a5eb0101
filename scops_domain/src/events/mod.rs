//! Domain events for the order/line processing lifecycle.

mod processing_events;

pub use processing_events::ProcessingEvent;
