// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Progress watcher
//!
//! Grounded on `progress_detail_updater` in the original driver: a
//! one-second cooperative task per line that tails the log file, maps
//! stage to overall progress, and commits it to the status store. Never
//! propagates a failure to the pipeline driver that spawned it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncSeekExt};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use scops_domain::value_objects::file_size::FileSize;
use scops_domain::value_objects::order_id::OrderId;
use scops_domain::value_objects::stage::Stage;
use scops_domain::{overall_progress, ScopsError};

use scops_domain::services::StatusStore;

const TAIL_LINES: usize = 6;
const TAIL_READ_BYTES: u64 = 16 * 1024;

/// Reads roughly the last `TAIL_LINES` lines of `path` without loading
/// the whole log into memory.
async fn tail_lines(path: &Path, lines: usize) -> std::io::Result<Vec<String>> {
    let mut file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    let start = len.saturating_sub(TAIL_READ_BYTES);
    file.seek(std::io::SeekFrom::Start(start)).await?;
    let reader = tokio::io::BufReader::new(file);
    let mut all = Vec::new();
    let mut stream = reader.lines();
    while let Some(line) = stream.next_line().await? {
        all.push(line);
    }
    let from = all.len().saturating_sub(lines);
    Ok(all.split_off(from))
}

fn extract_percent(tail: &[String]) -> Option<u8> {
    tail.iter().rev().find_map(|line| {
        let pos = line.find("Approximate percent complete:")?;
        line[pos..]
            .split(':')
            .nth(1)?
            .trim()
            .split_whitespace()
            .next()?
            .parse::<u8>()
            .ok()
            .map(|v| v.min(100))
    })
}

fn extract_megabytes(tail: &[String]) -> Option<FileSize> {
    tail.iter().rev().find_map(|line| {
        if !line.contains("megabytes") {
            return None;
        }
        line.split_whitespace().find_map(|token| token.parse::<f64>().ok()).map(|mb| FileSize {
            value: mb,
            unit: scops_domain::value_objects::file_size::SizeUnit::Mb,
        })
    })
}

pub struct ProgressWatcher {
    status_store: Arc<dyn StatusStore>,
}

impl ProgressWatcher {
    pub fn new(status_store: Arc<dyn StatusStore>) -> Self {
        Self { status_store }
    }

    /// Spawns the watcher for one line. The returned handle completes
    /// when `cancel` fires or the watcher itself observes a terminal
    /// stage (`complete` or an error).
    pub fn spawn(
        &self,
        order_id: OrderId,
        display_name: String,
        log_path: PathBuf,
        zip_path: PathBuf,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let status_store = self.status_store.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        match Self::tick(&status_store, &order_id, &display_name, &log_path, &zip_path).await {
                            Ok(done) if done => break,
                            Ok(_) => {}
                            Err(e) => warn!(line = %display_name, error = %e, "progress watcher tick failed, continuing"),
                        }
                    }
                }
            }
        })
    }

    /// Returns `Ok(true)` once the line has reached a terminal stage.
    async fn tick(
        status_store: &Arc<dyn StatusStore>,
        order_id: &OrderId,
        display_name: &str,
        log_path: &Path,
        zip_path: &Path,
    ) -> Result<bool, ScopsError> {
        let stage = status_store.get_stage(order_id, display_name).await?;
        if matches!(stage, Stage::Complete) || stage.is_error() {
            return Ok(true);
        }

        let tail = tail_lines(log_path, TAIL_LINES).await.unwrap_or_default();
        let mut percent = extract_percent(&tail).unwrap_or(0);

        let zipsize = match tokio::fs::metadata(zip_path).await {
            Ok(meta) => {
                percent = 0;
                FileSize::from_bytes(meta.len())
            }
            Err(_) => FileSize::zero(),
        };

        let filesize = extract_megabytes(&tail).unwrap_or_else(FileSize::zero);

        let progress = overall_progress(&stage, percent);
        status_store.update_progress(order_id, display_name, progress, filesize, zipsize).await?;
        Ok(false)
    }
}
