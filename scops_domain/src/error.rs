// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// Simple Concurrent Online Processing System
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A single hierarchical error type for the whole SCOPS domain, in the
//! spirit of a `thiserror`-derived domain error: every variant carries a
//! human-readable detail string, and errors are categorized by what an
//! operator or the intake daemon should do in response rather than by
//! which module raised them.
//!
//! ## Categories
//!
//! - **Validation**: malformed order files, unknown projections.
//! - **Pre-processing**: DEM coverage, missing delivery folders.
//! - **Stage failure**: an external binary exited non-zero or produced no
//!   output.
//! - **Transport**: SMTP and database failures.
//! - **Fatal**: conditions the submitter must abort the whole order for.

use thiserror::Error;

/// Domain-specific errors for the SCOPS order-processing system.
#[derive(Error, Debug, Clone)]
pub enum ScopsError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid order file: {0}")]
    InvalidOrderFile(String),

    #[error("unknown projection: {0}")]
    UnknownProjection(String),

    #[error("stage failed: {0}")]
    StageFailed(String),

    #[error("external tool failed: {0}")]
    ExternalToolFailed(String),

    #[error("DEM generation failed: {0}")]
    DemGenerationFailed(String),

    #[error("insufficient DEM coverage: {0}")]
    DemCoverageInsufficient(String),

    #[error("band-math error: {0}")]
    BandMathError(String),

    #[error("plugin error: {0}")]
    PluginError(String),

    #[error("workspace error: {0}")]
    WorkspaceError(String),

    #[error("status store error: {0}")]
    StatusStoreError(String),

    #[error("notification error: {0}")]
    NotificationError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("fatal: {0}")]
    Fatal(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl ScopsError {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn stage_failed(stage: impl std::fmt::Display, detail: impl std::fmt::Display) -> Self {
        Self::StageFailed(format!("{stage}: {detail}"))
    }

    /// Whether retrying the same operation unmodified might succeed.
    ///
    /// Mirrors the stage-failure recovery story in spec §7: stage
    /// failures are not retried automatically, only via an operator
    /// re-running `pipeline --resume`.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScopsError::IoError(_) | ScopsError::ResourceExhausted(_) | ScopsError::NotificationError(_)
        )
    }

    /// Whether the error is the user's to fix (vs. an operator's).
    pub fn is_user_actionable(&self) -> bool {
        matches!(self, ScopsError::DemCoverageInsufficient(_) | ScopsError::InvalidOrderFile(_))
    }

    /// Whether the order should be aborted entirely rather than continuing
    /// with other lines (spec §7 kind 5).
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScopsError::Fatal(_))
    }
}

impl From<std::io::Error> for ScopsError {
    fn from(e: std::io::Error) -> Self {
        ScopsError::IoError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_failed_formats_stage_and_detail() {
        let err = ScopsError::stage_failed("aplmask", "no output produced");
        assert_eq!(err.to_string(), "stage failed: aplmask: no output produced");
    }

    #[test]
    fn recoverability_matches_category() {
        assert!(ScopsError::IoError("x".into()).is_recoverable());
        assert!(!ScopsError::Fatal("x".into()).is_recoverable());
        assert!(ScopsError::DemCoverageInsufficient("x".into()).is_user_actionable());
    }
}
