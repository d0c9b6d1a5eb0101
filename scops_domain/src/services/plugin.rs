// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Plugin port
//!
//! Grounded on `plugins/spectral_angle.py`'s `run(output_folder,
//! hsi_filename)` contract: a named post-processing step over one
//! flightline's level-1 file, producing a new file that is then pipelined
//! with `band_list="ALL"` and the masking stage skipped.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ScopsError;

#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, output_folder: &Path, hsi_filename: &Path) -> Result<PathBuf, ScopsError>;
}
