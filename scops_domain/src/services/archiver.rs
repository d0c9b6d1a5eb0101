// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Archiver port
//!
//! Stored (uncompressed) zip packaging: the per-line `3b_mapped.bil.zip`
//! and the order-wide master zip are both one call to `create_zip`, the
//! only difference being which files go in.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ScopsError;

#[async_trait]
pub trait Archiver: Send + Sync {
    /// Creates a zip at `zip_path` containing `files`, stored (not
    /// deflated) to match the original's archive format.
    async fn create_zip(&self, zip_path: &Path, files: &[PathBuf]) -> Result<(), ScopsError>;
}
