// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Application layer
//!
//! Use cases orchestrate the domain ports defined in `scops_domain` into
//! the workflows the four CLI binaries expose: intake, submission, the
//! per-line pipeline, and band-math preprocessing.

pub mod commands;
pub mod services;
pub mod use_cases;
