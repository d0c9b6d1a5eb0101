// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Raster I/O port
//!
//! Reads and writes the ENVI `.bil`/`.hdr` raster pairs `band_math`
//! operates over. Kept separate from `band_math` itself so the
//! arithmetic stays a pure, filesystem-free function — this is the one
//! seam where bytes on disk become `Array2<f32>` and back.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use ndarray::Array2;

use crate::error::ScopsError;

#[async_trait]
pub trait RasterIo: Send + Sync {
    /// Reads the requested band numbers out of `bil_path`'s `.bil`/`.hdr`
    /// pair, keyed by band number.
    async fn read_bands(&self, bil_path: &Path, bands: &[u32]) -> Result<HashMap<u32, Array2<f32>>, ScopsError>;

    /// Writes a single-band `.bil`/`.hdr` pair at `output_path`, copying
    /// the spatial header fields (lines, samples, map info) from
    /// `header_template`.
    async fn write_band(&self, output_path: &Path, data: &Array2<f32>, header_template: &Path) -> Result<(), ScopsError>;

    /// Re-emits `source` (a mask `.bil`/`.hdr` pair) at `dest`, aligned to
    /// `header_template`'s dimensions — the `_mask.bil` /
    /// `_mask-badpixelmethod.bil` companion `bandmath` writes alongside
    /// its equation output.
    async fn copy_companion(&self, source: &Path, dest: &Path, header_template: &Path) -> Result<(), ScopsError>;
}
