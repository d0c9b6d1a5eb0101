// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # DEM generator port
//!
//! Grounded on `dem_nav_utilities.create_apl_dem_from_mosaic`: builds a
//! digital elevation model covering an order's flightlines from a mosaic
//! source and a navigation folder. Insufficient coverage is user-facing,
//! not an operator bug — see [`ScopsError::DemCoverageInsufficient`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ScopsError;

#[async_trait]
pub trait DemGenerator: Send + Sync {
    /// Produces a DEM at `dem_name`, mosaicked from `dem_source` using the
    /// navigation data under `nav_folder`.
    async fn create_from_mosaic(
        &self,
        dem_name: &Path,
        dem_source: &str,
        nav_folder: &Path,
    ) -> Result<PathBuf, ScopsError>;
}
