// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Submit order use case
//!
//! Grounded on `web_qsub.py`: turns one confirmed order into a workspace,
//! a full set of per-line status records, and a fanned-out dispatch to
//! the local or cluster pipeline executor. Implements steps 1-6 of §4.4.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use scops_domain::repositories::OrderRepository;
use scops_domain::services::notifier::OrderStarted;
use scops_domain::services::{LineSubmission, LineSubmitter, Notifier, StatusStore, WorkspaceBuilder};
use scops_domain::StatusRecord;

/// Per-line display link shown on the operator status page.
fn per_line_link(download_base_url: &str, workspace_id: &str, project_code: &str, line: &str) -> String {
    format!("{download_base_url}/processor/downloads/{workspace_id}/{line}?project={project_code}")
}

pub struct SubmitOrderUseCase {
    order_repo: Arc<dyn OrderRepository>,
    status_store: Arc<dyn StatusStore>,
    notifier: Arc<dyn Notifier>,
    workspace_builder: Arc<dyn WorkspaceBuilder>,
    line_submitter: Arc<dyn LineSubmitter>,
    download_base_url: String,
}

impl SubmitOrderUseCase {
    pub fn new(
        order_repo: Arc<dyn OrderRepository>,
        status_store: Arc<dyn StatusStore>,
        notifier: Arc<dyn Notifier>,
        workspace_builder: Arc<dyn WorkspaceBuilder>,
        line_submitter: Arc<dyn LineSubmitter>,
        download_base_url: impl Into<String>,
    ) -> Self {
        Self {
            order_repo,
            status_store,
            notifier,
            workspace_builder,
            line_submitter,
            download_base_url: download_base_url.into(),
        }
    }

    /// Submits the order at `order_path`. Errors that should abort the
    /// whole order (workspace root unwritable) propagate; everything else
    /// — a single line's submission failing, a stage-error notification
    /// failing to send — is logged and the order continues.
    pub async fn submit(&self, order_path: &Path) -> Result<()> {
        let order = self.order_repo.load(order_path).await.context("loading order file")?;

        let workspace = match self.workspace_builder.ensure(&order).await? {
            Some(workspace) => workspace,
            None => {
                info!(order_id = %order.id, "DEM coverage insufficient, leaving order in waiting state");
                return Ok(());
            }
        };

        // Step 3: protects against the intake daemon double-firing on the
        // next cron tick before this submission completes.
        self.order_repo.mark_submitted(order_path).await?;

        // Step 4: every line gets a status file and store row, whether or
        // not it contributes work, so the UI can render the whole order.
        for (line_key, line_record) in order.lines.iter() {
            let processing = line_record.requires_processing();
            let text = if processing { "waiting" } else { "not processing" };
            tokio::fs::write(
                workspace.status_file(line_key.as_str()),
                format!("{line_key} = {text}\n"),
            )
            .await
            .with_context(|| format!("writing status file for line {line_key}"))?;

            let link = per_line_link(&self.download_base_url, order.id.as_str(), &order.project_code, line_key.as_str());
            self.status_store
                .insert(&StatusRecord::new(order.id.clone(), line_key.as_str(), link))
                .await
                .unwrap_or_else(|e| warn!(line = %line_key, error = %e, "status row insert failed, continuing"));

            for eq in line_record.enabled_equations() {
                let suffix = eq.strip_prefix("eq_").unwrap_or(eq);
                let tagged_name = format!("{line_key}_{suffix}");
                tokio::fs::write(
                    workspace.status_file(&tagged_name),
                    format!("{tagged_name} = waiting\n"),
                )
                .await
                .with_context(|| format!("writing status file for equation {tagged_name}"))?;
                let link = per_line_link(&self.download_base_url, order.id.as_str(), &order.project_code, &tagged_name);
                self.status_store
                    .insert(&StatusRecord::new(order.id.clone(), tagged_name.clone(), link))
                    .await
                    .unwrap_or_else(|e| warn!(line = %tagged_name, error = %e, "status row insert failed, continuing"));
            }
        }

        // Step 5: guarded against re-submission (e.g. restart=true).
        if !order.flags.status_email_sent {
            match self
                .notifier
                .send_order_started(&OrderStarted { recipient: &order.email, project_code: &order.project_code })
                .await
            {
                Ok(()) => {
                    self.order_repo
                        .mark_status_email_sent(order_path)
                        .await
                        .unwrap_or_else(|e| warn!(error = %e, "failed to persist status_email_sent"));
                }
                Err(e) => warn!(order_id = %order.id, error = %e, "order-started notification failed"),
            }
        }

        // Step 6: fan out local/cluster dispatch. A single line's failure
        // to submit never aborts the rest of the order.
        let tmpfree_gb = order.tmpfree_gb();
        for (line_key, line_record) in order.lines_to_process() {
            let main_line = line_record.process;
            let band_ratio = line_record.enabled_equations().next().is_some();
            if !main_line && !band_ratio {
                continue;
            }
            let submission = LineSubmission {
                config_path: order_path.to_path_buf(),
                workspace_root: workspace.root().to_path_buf(),
                project_code: order.project_code.clone(),
                line: line_key.clone(),
                main_line,
                band_ratio,
                tmpfree_gb,
            };
            if let Err(e) = self.line_submitter.submit_line(&submission).await {
                warn!(line = %line_key, error = %e, "line submission failed, continuing with remaining lines");
            }
        }

        Ok(())
    }
}
