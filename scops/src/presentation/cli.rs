// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # CLI argument definitions
//!
//! One `clap::Parser` per binary (§6 of the command surface): `intake`,
//! `submitter`, `pipeline`, `bandmath`. Every binary also takes
//! `--settings`, pointing at the `scops.toml` the infrastructure layer
//! loads before wiring its adapters.

use std::path::PathBuf;

use clap::Parser;

use crate::application::commands::{IntakeCommand, PreprocessCommand, ProcessLineCommand, SubmitOrderCommand};

fn default_settings_path() -> PathBuf {
    PathBuf::from("scops.toml")
}

/// `intake [--settings <path>] [--order-dir <dir>]`
///
/// One pass over the order directory, submitting every order ready for
/// it. Run on a cron schedule by the operator, not looped in-process.
#[derive(Debug, Parser)]
#[command(name = "intake", about = "Scan the order directory and submit ready orders")]
pub struct IntakeArgs {
    #[arg(long, default_value_os_t = default_settings_path())]
    pub settings: PathBuf,

    /// Overrides `pipeline.delivery_root`-adjacent order directory from
    /// `scops.toml` when set; otherwise the configured value is used.
    #[arg(long)]
    pub order_dir: Option<PathBuf>,
}

impl IntakeArgs {
    pub fn into_command(self, configured_order_dir: PathBuf) -> IntakeCommand {
        IntakeCommand { order_dir: self.order_dir.unwrap_or(configured_order_dir) }
    }
}

/// `submitter -c <cfg> [--local] [--settings <path>]`
#[derive(Debug, Parser)]
#[command(name = "submitter", about = "Submit one confirmed order for processing")]
pub struct SubmitterArgs {
    #[arg(long, default_value_os_t = default_settings_path())]
    pub settings: PathBuf,

    /// Path to the order's `.cfg` file.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Dispatch lines in-process instead of through the configured
    /// cluster scheduler.
    #[arg(long)]
    pub local: bool,
}

impl SubmitterArgs {
    pub fn into_command(self) -> SubmitOrderCommand {
        SubmitOrderCommand { order_path: self.config, local: self.local }
    }
}

/// `pipeline -c <cfg> -l <line> -o <workspace> [-m] [-b] [-r] [--settings <path>]`
#[derive(Debug, Parser)]
#[command(name = "pipeline", about = "Run one flightline through the mask/geocorrect/reproject/map stages")]
pub struct PipelineArgs {
    #[arg(long, default_value_os_t = default_settings_path())]
    pub settings: PathBuf,

    /// Path to the order's `.cfg` file.
    #[arg(short, long)]
    pub config: PathBuf,

    /// The flightline name, e.g. `f123`.
    #[arg(short, long)]
    pub line: String,

    /// The order's workspace root.
    #[arg(short, long)]
    pub workspace: PathBuf,

    /// Run the main hyperspectral line.
    #[arg(short = 'm', long)]
    pub main_line: bool,

    /// Run the line's enabled band-math equations.
    #[arg(short = 'b', long)]
    pub band_ratio: bool,

    /// Resume from the line's last recorded stage instead of starting
    /// at masking.
    #[arg(short = 'r', long)]
    pub resume: bool,
}

impl PipelineArgs {
    pub fn into_command(self) -> ProcessLineCommand {
        ProcessLineCommand {
            config_path: self.config,
            line: self.line,
            workspace: self.workspace,
            main_line: self.main_line,
            band_ratio: self.band_ratio,
            resume: self.resume,
        }
    }
}

/// `bandmath -e <expr> [-o <dir>] [-m <mask>] [-n <name>] <bil> [--settings <path>]`
#[derive(Debug, Parser)]
#[command(name = "bandmath", about = "Evaluate a band-math equation over one .bil file")]
pub struct BandmathArgs {
    #[arg(long, default_value_os_t = default_settings_path())]
    pub settings: PathBuf,

    /// The equation, e.g. `(band4 - band3) / (band4 + band3)`.
    #[arg(short, long)]
    pub equation: String,

    /// Directory the result is written into; defaults to the current
    /// directory.
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// A companion mask `.bil` re-emitted alongside the result.
    #[arg(short = 'm', long)]
    pub mask: Option<PathBuf>,

    /// Overrides the equation-derived name used in the output filename.
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// The input `.bil` file.
    pub input: PathBuf,
}

impl BandmathArgs {
    pub fn into_command(self) -> PreprocessCommand {
        PreprocessCommand { equation: self.equation, input: self.input, output_dir: self.output_dir, mask: self.mask, name: self.name }
    }
}
