// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure logging
//!
//! One-time `tracing-subscriber` initialization shared by all four
//! binaries. Structured so operator tooling can grep/filter by order and
//! line: every pipeline span carries `processing_id` and `line` fields,
//! every stage transition carries `stage`.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global `tracing` subscriber. Respects `RUST_LOG`,
/// defaulting to `info` when unset. Safe to call once per process; a
/// second call is a logic error in the caller, not guarded against here
/// since each binary has exactly one entry point.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();
}
