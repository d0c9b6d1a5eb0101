// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Presentation layer
//!
//! The `clap`-derived CLI surface for the four binaries. Each `Args`
//! struct here maps one-to-one onto an `application::commands` value;
//! parsing and validation stay here so the use cases never see raw
//! argument strings.

pub mod cli;
