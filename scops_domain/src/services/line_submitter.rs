// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Line submitter port
//!
//! Abstracts "dispatch this line's pipeline invocation" over the two
//! submission modes in `web_qsub.py`: an in-process local call, or a
//! cluster submission (`qsub`/`bsub`) whose argument vector the adapter
//! builds from the request. Kept out of `submit_order` so the use case
//! neither knows nor cares which mode is active.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::ScopsError;
use crate::value_objects::line_name::LineKey;

/// Everything a line submitter needs to dispatch one pipeline invocation.
#[derive(Debug, Clone)]
pub struct LineSubmission {
    pub config_path: PathBuf,
    pub workspace_root: PathBuf,
    pub project_code: String,
    pub line: LineKey,
    /// `line.process` — whether to run the main hyperspectral line.
    pub main_line: bool,
    /// Whether any `eq_*` selector is enabled for this line.
    pub band_ratio: bool,
    /// `1.5 × declared size`, or 100 on failure to determine it —
    /// sizes the cluster job's `tmpfree` resource request.
    pub tmpfree_gb: f64,
}

#[async_trait]
pub trait LineSubmitter: Send + Sync {
    async fn submit_line(&self, submission: &LineSubmission) -> Result<(), ScopsError>;
}
