// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Order repository port
//!
//! Reads and writes an order's `.cfg` file. Grounded on the original's
//! direct `ConfigParser` reads scattered across `scops_processing_cron.py`
//! and `web_qsub.py`; centralized here behind one port so the intake
//! daemon, submitter, and pipeline driver share one source of truth for
//! order-file parsing and the `submitted=True` rewrite.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::entities::order::Order;
use crate::error::ScopsError;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Lists every `.cfg` file in the order directory, unparsed.
    async fn list_order_files(&self, order_dir: &Path) -> Result<Vec<PathBuf>, ScopsError>;

    async fn load(&self, path: &Path) -> Result<Order, ScopsError>;

    /// Rewrites the `DEFAULT` section's `submitted` field to `true`,
    /// idempotently — the one write-back the submitter performs before
    /// dispatch.
    async fn mark_submitted(&self, path: &Path) -> Result<(), ScopsError>;

    /// Rewrites `status_email_sent=true`, guarding the order-started
    /// e-mail so a re-run (e.g. `restart=true`) never sends it twice.
    async fn mark_status_email_sent(&self, path: &Path) -> Result<(), ScopsError>;
}
