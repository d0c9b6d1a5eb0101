// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Preprocess use case
//!
//! Grounded on `scops_bandmath.py`'s CLI entry point: evaluate one
//! equation over a `.bil` file's bands and write the result alongside
//! (or into an output directory), with an optional mask file carried
//! through as a companion raster.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use scops_domain::services::band_math;
use scops_domain::services::RasterIo;
use scops_domain::value_objects::band_range::BandRange;

use super::super::commands::PreprocessCommand;

pub struct PreprocessUseCase {
    raster_io: Arc<dyn RasterIo>,
}

/// Derives the `bandmath`-style clean equation name used in output
/// filenames when the caller doesn't supply `-n`.
fn clean_equation_name(equation: &str) -> String {
    equation.replace('*', "x").replace('/', "").replace(' ', "_")
}

impl PreprocessUseCase {
    pub fn new(raster_io: Arc<dyn RasterIo>) -> Self {
        Self { raster_io }
    }

    /// Evaluates `command.equation` over `command.input`'s referenced
    /// bands and writes the result `.bil`/`.hdr` pair, returning its path.
    pub async fn run(&self, command: &PreprocessCommand) -> Result<PathBuf> {
        let band_numbers: Vec<u32> = BandRange::band_numbers_in_equation(&command.equation)
            .into_iter()
            .filter_map(|n| n.parse().ok())
            .collect();

        let bands = self
            .raster_io
            .read_bands(&command.input, &band_numbers)
            .await
            .context("reading input bands")?;

        let result = band_math::evaluate(&command.equation, &bands).context("evaluating equation")?;

        let equation_name = command.name.clone().unwrap_or_else(|| clean_equation_name(&command.equation));

        let stem = command
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow::anyhow!("input path has no file stem: {}", command.input.display()))?;

        let output_dir = command
            .output_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let output_path = output_dir.join(format!("{stem}_{equation_name}.bil"));

        self.raster_io
            .write_band(&output_path, &result, &command.input)
            .await
            .context("writing equation output")?;

        if let Some(mask) = &command.mask {
            let mask_companion = output_path.with_file_name(format!("{stem}_{equation_name}_mask.bil"));
            self.raster_io
                .copy_companion(mask, &mask_companion, &command.input)
                .await
                .context("writing mask companion")?;
        }

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_names_strip_operators_and_spaces() {
        assert_eq!(clean_equation_name("band4 / band3"), "band4_band3");
        assert_eq!(clean_equation_name("band4 * 2"), "band4_x_2");
    }
}
