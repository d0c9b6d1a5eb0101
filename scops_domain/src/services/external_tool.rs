// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # External tool runner port
//!
//! One call site shared by the four `aplmask`/`aplcorr`/`apltran`/`aplmap`
//! invocations: run a command, stream its output to a log file, and
//! report whether it exited cleanly. Stage-specific argument-vector
//! construction and success predicates stay in the application layer.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ScopsError;

#[async_trait]
pub trait ExternalToolRunner: Send + Sync {
    /// Runs `binary` with `args`, appending combined stdout/stderr to
    /// `log_file`. Returns the exit status; a non-zero or missing status
    /// is the caller's signal to raise `ScopsError::stage_failed`.
    async fn run(&self, binary: &str, args: &[String], log_file: &Path) -> Result<ExitOutcome, ScopsError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    pub success: bool,
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success() -> Self {
        ExitOutcome { success: true, code: Some(0) }
    }

    pub fn failure(code: Option<i32>) -> Self {
        ExitOutcome { success: false, code }
    }
}
