// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # APL DEM generator
//!
//! Implements [`DemGenerator`] over the `apldem` binary, grounded on
//! `dem_nav_utilities.create_apl_dem_from_mosaic`. Reuses
//! [`ExternalToolRunner`] rather than spawning its own child process,
//! since the one thing that differs from the four pipeline stages is the
//! success predicate: a log mentioning insufficient coverage is a
//! user-actionable failure, not an operator bug, matching the
//! `reason='dem_coverage'` path in the original's
//! `email_preprocessing_error`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use scops_domain::error::ScopsError;
use scops_domain::services::{DemGenerator, ExternalToolRunner};

const COVERAGE_MARKER: &str = "does not cover enough of the project area";

pub struct AplDemGenerator {
    tool_runner: Arc<dyn ExternalToolRunner>,
    log_dir: PathBuf,
}

impl AplDemGenerator {
    pub fn new(tool_runner: Arc<dyn ExternalToolRunner>, log_dir: PathBuf) -> Self {
        Self { tool_runner, log_dir }
    }
}

#[async_trait]
impl DemGenerator for AplDemGenerator {
    async fn create_from_mosaic(&self, dem_name: &Path, dem_source: &str, nav_folder: &Path) -> Result<PathBuf, ScopsError> {
        tokio::fs::create_dir_all(&self.log_dir).await.map_err(|e| ScopsError::IoError(e.to_string()))?;
        let log_path = self.log_dir.join("dem_generation_log.txt");

        let args = vec![
            "-o".to_string(),
            dem_name.display().to_string(),
            "-s".to_string(),
            dem_source.to_string(),
            "-n".to_string(),
            nav_folder.display().to_string(),
        ];

        let outcome = self.tool_runner.run("apldem", &args, &log_path).await?;

        if outcome.success && dem_name.exists() {
            return Ok(dem_name.to_path_buf());
        }

        let log_text = tokio::fs::read_to_string(&log_path).await.unwrap_or_default();
        if log_text.contains(COVERAGE_MARKER) {
            return Err(ScopsError::DemCoverageInsufficient(dem_source.to_string()));
        }
        Err(ScopsError::DemGenerationFailed(format!("apldem exited with {:?}", outcome.code)))
    }
}
