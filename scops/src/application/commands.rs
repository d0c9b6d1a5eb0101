// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Application commands
//!
//! One command per CLI surface (§6): an immutable, validated request
//! object the presentation layer builds from parsed arguments and hands
//! to the matching use case. Kept thin — the use cases themselves own
//! orchestration, these just carry inputs.

use std::path::PathBuf;

/// `intake` — no arguments; the order directory comes from configuration.
#[derive(Debug, Clone)]
pub struct IntakeCommand {
    pub order_dir: PathBuf,
}

/// `submitter -c <cfg> [--local]`
#[derive(Debug, Clone)]
pub struct SubmitOrderCommand {
    pub order_path: PathBuf,
    pub local: bool,
}

/// `pipeline -c <cfg> -l <line> -o <workspace> [-m] [-b] [-r]`
#[derive(Debug, Clone)]
pub struct ProcessLineCommand {
    pub config_path: PathBuf,
    pub line: String,
    pub workspace: PathBuf,
    /// `-m`: run the main hyperspectral line.
    pub main_line: bool,
    /// `-b`: run the line's enabled band-math equations.
    pub band_ratio: bool,
    /// `-r`: resume from the line's last recorded stage.
    pub resume: bool,
}

/// `bandmath -e <expr> [-o <dir>] [-m <mask>] [-n <name>] <bil>`
#[derive(Debug, Clone)]
pub struct PreprocessCommand {
    pub equation: String,
    pub input: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub mask: Option<PathBuf>,
    pub name: Option<String>,
}
