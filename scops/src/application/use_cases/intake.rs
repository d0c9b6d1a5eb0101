// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Intake use case
//!
//! Grounded on `scops_processing_cron.py`: one pass over the order
//! directory's `.cfg` files, handing every order that passes
//! `SubmissionFlags::is_ready_for_submission` to the submitter. Invoked
//! once per run by the `intake` binary; the OS cron schedule supplies the
//! repetition, not a loop in here.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use scops_domain::repositories::OrderRepository;

use super::submit_order::SubmitOrderUseCase;

pub struct IntakeUseCase {
    order_repo: Arc<dyn OrderRepository>,
    submitter: Arc<SubmitOrderUseCase>,
}

impl IntakeUseCase {
    pub fn new(order_repo: Arc<dyn OrderRepository>, submitter: Arc<SubmitOrderUseCase>) -> Self {
        Self { order_repo, submitter }
    }

    /// Scans `order_dir`, submitting every order ready for it. A single
    /// order failing to parse or submit is logged and does not stop the
    /// scan of the rest of the directory.
    pub async fn run_once(&self, order_dir: &Path) -> Result<()> {
        let files = self.order_repo.list_order_files(order_dir).await.context("listing order files")?;

        for path in files {
            let order = match self.order_repo.load(&path).await {
                Ok(order) => order,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unparsable order file");
                    continue;
                }
            };

            if !order.flags.is_ready_for_submission() {
                continue;
            }

            info!(order_id = %order.id, path = %path.display(), "order ready for submission");
            if let Err(e) = self.submitter.submit(&path).await {
                warn!(order_id = %order.id, error = %e, "order submission failed, continuing scan");
            }
        }

        Ok(())
    }
}
