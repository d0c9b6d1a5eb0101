// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Application services
//!
//! Long-lived cooperative workers spawned by a use case rather than
//! invoked for a single request/response, e.g. the per-line progress
//! watcher started by [`super::use_cases::process_line`].

pub mod progress_watcher;

pub use progress_watcher::ProgressWatcher;
