// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure layer
//!
//! Concrete adapters for the domain ports, plus the ambient concerns
//! (configuration, logging, metrics) every binary wires up before
//! touching a use case.

pub mod adapters;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod repositories;
pub mod runtime;
pub mod services;
