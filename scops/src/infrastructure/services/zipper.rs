// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Stored zip archiver
//!
//! Implements [`Archiver`] via the `zip` crate with
//! `CompressionMethod::Stored`, matching the original's plain
//! `zipfile.ZipFile` usage for both the per-line archive and the
//! order-wide master zip. The `zip` crate's API is synchronous, so the
//! whole write runs inside `spawn_blocking`.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use scops_domain::error::ScopsError;
use scops_domain::services::Archiver;

fn build_zip(zip_path: &Path, files: &[PathBuf]) -> Result<(), ZipError> {
    let zip_file = File::create(zip_path)?;
    let mut writer = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for file in files {
        let name = file.file_name().and_then(|n| n.to_str()).unwrap_or("file").to_string();
        writer.start_file(name, options)?;
        let mut source = File::open(file)?;
        io::copy(&mut source, &mut writer)?;
    }
    writer.finish()?.flush()?;
    Ok(())
}

pub struct StoredZipArchiver;

impl StoredZipArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StoredZipArchiver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Archiver for StoredZipArchiver {
    async fn create_zip(&self, zip_path: &Path, files: &[PathBuf]) -> Result<(), ScopsError> {
        let zip_path = zip_path.to_path_buf();
        let files = files.to_vec();
        tokio::task::spawn_blocking(move || build_zip(&zip_path, &files))
            .await
            .map_err(|e| ScopsError::IoError(e.to_string()))?
            .map_err(|e| ScopsError::IoError(e.to_string()))
    }
}
