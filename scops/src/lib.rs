// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # SCOPS
//!
//! Simple Concurrent Online Processing System: takes user orders for
//! airborne hyperspectral flightline processing, runs each line through
//! a four-stage external toolchain (mask, geocorrect, reproject, map),
//! packages results, and e-mails users when their order is ready.
//!
//! ## Layers
//!
//! - [`application`] — use cases orchestrating the domain ports, one per
//!   CLI binary: intake, submission, the per-line pipeline, band-math.
//! - [`infrastructure`] — concrete adapters for those ports (SQLite,
//!   SMTP, the APL toolchain, ENVI raster I/O, zip packaging) plus the
//!   ambient configuration/logging/metrics stack.
//! - [`presentation`] — the `clap`-based CLI surface each binary parses
//!   into an `application::commands` value.
//!
//! Domain types (entities, value objects, ports) live in `scops_domain`.

pub mod application;
pub mod infrastructure;
pub mod presentation;

// Tests are organized as:
// - Unit tests: #[cfg(test)] modules within each source file
// - Integration tests: separate files in tests/ directory
