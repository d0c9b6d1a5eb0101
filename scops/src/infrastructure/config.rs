// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure configuration
//!
//! Layers a `scops.toml` file with `SCOPS_`-prefixed environment variable
//! overrides via the `config` crate, satisfying the "every configuration
//! constant may be overridden by an environment variable" requirement
//! generically rather than per-constant.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// How a line is dispatched once the submitter has written its status
/// file: in-process, or to a cluster scheduler.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum SubmissionMode {
    Local,
    ClusterSge { queue: String, project: String },
    ClusterLsf { queue: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// `sqlx` connection string, e.g. `sqlite:///var/scops/status.db`.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// `Some` ⇒ stage outputs are written to scratch and moved into the
    /// workspace on completion; `None` ⇒ written directly.
    pub temp_root: Option<PathBuf>,
    pub separation_file: PathBuf,
    pub bad_pixel_mask_file: Option<PathBuf>,
    pub delivery_root: PathBuf,
    pub error_address: String,
    #[serde(default)]
    pub error_bcc: Vec<String>,
    pub download_base_url: String,
    /// Root holding each APL binary (`aplmask`, `aplcorr`, `apltran`,
    /// `aplmap`); `None` resolves them from `PATH`.
    pub tool_bin_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub smtp: SmtpSettings,
    pub pipeline: PipelineSettings,
    pub submission: SubmissionMode,
    /// Base directory workspaces are created under when an order file
    /// has no pre-existing `output_folder`.
    pub workspace_base: PathBuf,
    /// Directory `intake` scans for `.cfg` order files.
    pub order_dir: PathBuf,
    /// Directory `apldem` logs are written to.
    pub log_dir: PathBuf,
    /// Path to the `pipeline` binary the cluster/local submitter
    /// invokes for each line.
    pub pipeline_binary: PathBuf,
    /// CSV of reference spectra for the `spectral_angle` plugin;
    /// `None` disables it.
    pub reference_spectra_file: Option<PathBuf>,
}

impl Settings {
    /// Loads `scops.toml` from `path`, then applies `SCOPS_`-prefixed
    /// environment overrides (`SCOPS_DATABASE__URL`, `SCOPS_SMTP__HOST`,
    /// ...), matching the teacher's layered `config::Config` pattern.
    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("SCOPS").separator("__"))
            .build()?;
        settings.try_deserialize()
    }
}
