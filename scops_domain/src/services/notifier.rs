// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Notifier port
//!
//! Grounded on `send_email`/`email_PI` in the original driver: one
//! envelope per recipient, with BCC recipients looped rather than placed
//! on the envelope itself.

use async_trait::async_trait;

use crate::error::ScopsError;

#[derive(Debug, Clone)]
pub struct OrderStarted<'a> {
    pub recipient: &'a str,
    pub project_code: &'a str,
}

#[derive(Debug, Clone)]
pub struct StageError<'a> {
    pub line: &'a str,
    pub stage: &'a str,
    pub detail: &'a str,
}

#[derive(Debug, Clone)]
pub struct PreprocessingError<'a> {
    pub recipient: &'a str,
    pub line: &'a str,
    pub detail: &'a str,
}

#[derive(Debug, Clone)]
pub struct OrderComplete<'a> {
    pub recipient: &'a str,
    pub project_code: &'a str,
    pub download_link: &'a str,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_order_started(&self, message: &OrderStarted<'_>) -> Result<(), ScopsError>;

    async fn send_confirmation(&self, recipient: &str, project_code: &str) -> Result<(), ScopsError>;

    /// Recipients are the configured error address plus the BCC code
    /// list; sent once per stage failure.
    async fn send_stage_error(&self, message: &StageError<'_>) -> Result<(), ScopsError>;

    /// A user-actionable pre-processing error (e.g. insufficient DEM
    /// coverage) addressed to the order's submitter.
    async fn send_preprocessing_error(&self, message: &PreprocessingError<'_>) -> Result<(), ScopsError>;

    async fn send_order_complete(&self, message: &OrderComplete<'_>) -> Result<(), ScopsError>;
}
