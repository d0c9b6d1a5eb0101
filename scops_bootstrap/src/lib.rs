// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap
//!
//! Sits outside the domain/application/infrastructure layers and
//! provides what every binary needs before its own composition root
//! runs: platform abstraction, graceful shutdown coordination, a
//! pre-tracing-init logger, and Unix exit code mapping.
//!
//! CLI argument parsing lives in `scops::presentation::cli` instead of
//! here — the four binaries have distinct, simple argument shapes
//! better modeled as one `clap::Parser` each than as a shared
//! multi-subcommand parser.
//!
//! ## Key design principles
//!
//! 1. Bootstrap can depend on every other layer; no other layer depends
//!    on bootstrap, keeping the architectural boundary one-directional.
//! 2. Platform-specific functionality stays behind the `Platform` trait,
//!    with POSIX and Windows implementations selected at compile time.
//! 3. Shutdown is coordinated through a cancellation token with a grace
//!    period, not an abrupt process exit.

pub mod exit_code;
pub mod logger;
pub mod platform;
pub mod shutdown;

pub use exit_code::{map_error_to_exit_code, result_to_exit_code, ExitCode};
