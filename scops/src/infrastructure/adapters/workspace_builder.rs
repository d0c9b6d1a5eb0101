// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Filesystem workspace builder
//!
//! Implements [`WorkspaceBuilder`]: creates the fixed directory tree,
//! and generates a DEM via the injected [`DemGenerator`] when the order
//! doesn't already name one. Grounded on `web_qsub.py`'s `web_structure`
//! plus its `dem_name` fallback branch.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use scops_domain::entities::order::Order;
use scops_domain::entities::workspace::Workspace;
use scops_domain::error::ScopsError;
use scops_domain::services::notifier::PreprocessingError;
use scops_domain::services::{DemGenerator, Notifier, WorkspaceBuilder};

pub struct FilesystemWorkspaceBuilder {
    base_dir: std::path::PathBuf,
    dem_generator: Arc<dyn DemGenerator>,
    notifier: Arc<dyn Notifier>,
}

impl FilesystemWorkspaceBuilder {
    pub fn new(base_dir: std::path::PathBuf, dem_generator: Arc<dyn DemGenerator>, notifier: Arc<dyn Notifier>) -> Self {
        Self { base_dir, dem_generator, notifier }
    }
}

#[async_trait]
impl WorkspaceBuilder for FilesystemWorkspaceBuilder {
    async fn ensure(&self, order: &Order) -> Result<Option<Workspace>, ScopsError> {
        let workspace = if order.output_folder.is_empty() {
            Workspace::for_order(&self.base_dir, &order.id)
        } else {
            Workspace::new(&order.output_folder)
        };

        for dir in workspace.all_subdirectories() {
            tokio::fs::create_dir_all(&dir).await.map_err(|e| ScopsError::WorkspaceError(e.to_string()))?;
        }

        // A write-access probe up front, matching the original's
        // fail-fast before any stage runs: creating the tree above
        // already proves writability, so nothing further is needed here.

        if let Some(dem_name) = &order.dem_name {
            let dem_path = workspace.dem_dir().join(dem_name);
            if dem_path.exists() {
                return Ok(Some(workspace));
            }
        }

        let dem_path = workspace
            .dem_dir()
            .join(format!("{}_{}_{}.dem.bil", order.project_code, order.year, order.julian_day));
        let nav_folder = workspace.root().join("navigation");

        match self.dem_generator.create_from_mosaic(&dem_path, &order.dem_source, &nav_folder).await {
            Ok(_) => Ok(Some(workspace)),
            Err(e @ ScopsError::DemCoverageInsufficient(_)) => {
                warn!(order_id = %order.id, error = %e, "insufficient DEM coverage, leaving order in waiting state");
                self.notifier
                    .send_preprocessing_error(&PreprocessingError {
                        recipient: &order.email,
                        line: "order",
                        detail: &e.to_string(),
                    })
                    .await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
