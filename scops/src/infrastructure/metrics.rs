// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Metrics
//!
//! A small set of `prometheus` counters for operator dashboards: stage
//! transitions and completions. Intentionally minimal — no auto-tuning
//! of cluster resources reads these, they're exposition only.

use prometheus::{IntCounterVec, Opts, Registry};

pub struct PipelineMetrics {
    pub stage_transitions: IntCounterVec,
    pub stage_failures: IntCounterVec,
    pub orders_completed: prometheus::IntCounter,
}

impl PipelineMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let stage_transitions = IntCounterVec::new(
            Opts::new("scops_stage_transitions_total", "Stage transitions by stage name"),
            &["stage"],
        )?;
        let stage_failures = IntCounterVec::new(
            Opts::new("scops_stage_failures_total", "Stage failures by stage name"),
            &["stage"],
        )?;
        let orders_completed =
            prometheus::IntCounter::new("scops_orders_completed_total", "Orders whose master zip was produced")?;

        registry.register(Box::new(stage_transitions.clone()))?;
        registry.register(Box::new(stage_failures.clone()))?;
        registry.register(Box::new(orders_completed.clone()))?;

        Ok(Self { stage_transitions, stage_failures, orders_completed })
    }

    pub fn record_transition(&self, stage: &str) {
        self.stage_transitions.with_label_values(&[stage]).inc();
    }

    pub fn record_failure(&self, stage: &str) {
        self.stage_failures.with_label_values(&[stage]).inc();
    }

    pub fn record_order_completed(&self) {
        self.orders_completed.inc();
    }
}
