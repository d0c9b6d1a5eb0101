// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Plugin registry
//!
//! Grounded on `plugins/spectral_angle.py`: a spectral-angle classifier
//! comparing every pixel's spectrum against a fixed set of reference
//! spectra and emitting a classification mask of the closest match.
//! Plugins are a static `Vec<Arc<dyn Plugin>>` built once at start-up —
//! no dynamic loading, per the redesign note against the original's
//! ad hoc `plugins/` directory convention.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use ndarray::Array2;

use scops_domain::error::ScopsError;
use scops_domain::services::{Plugin, RasterIo};

/// Reads a headerless CSV of reference spectra, one row per spectrum,
/// one column per band, matching the original's plain
/// `numpy.loadtxt(..., delimiter=',')` convention.
pub fn load_reference_spectra(path: &Path) -> Result<Array2<f32>, ScopsError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| ScopsError::IoError(format!("reading reference spectra {}: {e}", path.display())))?;

    let mut rows = Vec::new();
    let mut ncols = 0;
    for record in reader.records() {
        let record = record.map_err(|e| ScopsError::IoError(format!("parsing reference spectra {}: {e}", path.display())))?;
        let row: Vec<f32> = record
            .iter()
            .map(|field| field.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|e| ScopsError::IoError(format!("reference spectra {} has a non-numeric field: {e}", path.display())))?;
        ncols = row.len();
        rows.push(row);
    }

    let nrows = rows.len();
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| ScopsError::IoError(format!("reference spectra {} is ragged: {e}", path.display())))
}

/// No-data sentinel matching the original's `nodata=2**16-1`.
const NODATA: f32 = 65535.0;

pub struct SpectralAngleClassifier {
    raster_io: Arc<dyn RasterIo>,
    /// One row per reference spectrum, one column per band.
    reference_spectra: Array2<f32>,
}

impl SpectralAngleClassifier {
    pub fn new(raster_io: Arc<dyn RasterIo>, reference_spectra: Array2<f32>) -> Self {
        Self { raster_io, reference_spectra }
    }

    fn classify(&self, bands: &std::collections::HashMap<u32, Array2<f32>>) -> Result<Array2<f32>, ScopsError> {
        let band_count = self.reference_spectra.ncols();
        let (rows, cols) = bands
            .get(&1)
            .map(|b| b.dim())
            .ok_or_else(|| ScopsError::PluginError("missing band 1 in input raster".to_string()))?;

        let mut hsi_magnitude = Array2::<f32>::zeros((rows, cols));
        for band_index in 1..=band_count as u32 {
            let band = bands
                .get(&band_index)
                .ok_or_else(|| ScopsError::PluginError(format!("missing band {band_index} in input raster")))?;
            hsi_magnitude = hsi_magnitude + band * band;
        }
        hsi_magnitude.mapv_inplace(f32::sqrt);

        let mut best_angle = Array2::<f32>::from_elem((rows, cols), f32::MAX);
        let mut classification = Array2::<f32>::from_elem((rows, cols), NODATA);

        for (spectrum_index, spectrum) in self.reference_spectra.outer_iter().enumerate() {
            let spectrum_magnitude: f32 = spectrum.iter().map(|v| v * v).sum::<f32>().sqrt();
            let mut dot_sum = Array2::<f32>::zeros((rows, cols));
            for (band_index, coefficient) in spectrum.iter().enumerate() {
                let band = bands.get(&(band_index as u32 + 1)).expect("validated above");
                dot_sum = dot_sum + band * *coefficient;
            }

            for r in 0..rows {
                for c in 0..cols {
                    let denom = hsi_magnitude[[r, c]] * spectrum_magnitude;
                    let cos_angle = if denom == 0.0 { 0.0 } else { dot_sum[[r, c]] / denom };
                    let angle = cos_angle.clamp(-1.0, 1.0).acos();
                    if angle < best_angle[[r, c]] {
                        best_angle[[r, c]] = angle;
                        classification[[r, c]] = (spectrum_index + 1) as f32;
                    }
                }
            }
        }

        Ok(classification)
    }
}

#[async_trait]
impl Plugin for SpectralAngleClassifier {
    fn name(&self) -> &str {
        "spectral_angle"
    }

    async fn run(&self, output_folder: &Path, hsi_filename: &Path) -> Result<PathBuf, ScopsError> {
        let band_count = self.reference_spectra.ncols() as u32;
        let bands: Vec<u32> = (1..=band_count).collect();
        let data = self.raster_io.read_bands(hsi_filename, &bands).await?;
        let classification = self.classify(&data)?;

        let stem = hsi_filename.file_stem().and_then(|s| s.to_str()).unwrap_or("line");
        let output_path = output_folder.join(format!("{stem}_spectral_angle.bil"));
        self.raster_io.write_band(&output_path, &classification, hsi_filename).await?;
        Ok(output_path)
    }
}

/// Builds the fixed plugin set injected into `ProcessLineUseCase`.
/// `None` reference spectra means the classifier is unavailable in this
/// deployment (no spectra file configured) rather than registered with
/// empty, meaningless output.
pub fn builtin_plugins(raster_io: Arc<dyn RasterIo>, reference_spectra: Option<Array2<f32>>) -> Vec<Arc<dyn Plugin>> {
    let mut plugins: Vec<Arc<dyn Plugin>> = Vec::new();
    if let Some(spectra) = reference_spectra {
        plugins.push(Arc::new(SpectralAngleClassifier::new(raster_io, spectra)));
    }
    plugins
}
