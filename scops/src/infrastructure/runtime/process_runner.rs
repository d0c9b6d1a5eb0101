// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Child process tool runner
//!
//! Implements [`ExternalToolRunner`] by spawning the APL binaries as
//! child processes, redirecting combined stdout/stderr into the per-line
//! log file the progress watcher tails.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{info, warn};

use scops_domain::error::ScopsError;
use scops_domain::services::external_tool::{ExitOutcome, ExternalToolRunner};

pub struct ChildProcessToolRunner {
    /// `Some` prefixes every binary name with this directory; `None`
    /// resolves the binary from `PATH`.
    bin_dir: Option<PathBuf>,
}

impl ChildProcessToolRunner {
    pub fn new(bin_dir: Option<PathBuf>) -> Self {
        Self { bin_dir }
    }

    fn resolve(&self, binary: &str) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(binary),
            None => PathBuf::from(binary),
        }
    }
}

#[async_trait]
impl ExternalToolRunner for ChildProcessToolRunner {
    async fn run(&self, binary: &str, args: &[String], log_file: &Path) -> Result<ExitOutcome, ScopsError> {
        let program = self.resolve(binary);
        info!(binary, args = ?args, "spawning external tool");

        let mut child = Command::new(&program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ScopsError::ExternalToolFailed(format!("failed to spawn {}: {e}", program.display())))?;

        let mut stdout = child.stdout.take().expect("piped stdout");
        let mut stderr = child.stderr.take().expect("piped stderr");
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .await
            .map_err(|e| ScopsError::IoError(e.to_string()))?;

        let mut out_buf = Vec::new();
        let mut err_buf = Vec::new();
        let (out_result, err_result, status) = tokio::join!(
            stdout.read_to_end(&mut out_buf),
            stderr.read_to_end(&mut err_buf),
            child.wait(),
        );
        out_result.map_err(|e| ScopsError::IoError(e.to_string()))?;
        err_result.map_err(|e| ScopsError::IoError(e.to_string()))?;
        let status = status.map_err(|e| ScopsError::ExternalToolFailed(e.to_string()))?;

        log.write_all(&out_buf).await.map_err(|e| ScopsError::IoError(e.to_string()))?;
        log.write_all(&err_buf).await.map_err(|e| ScopsError::IoError(e.to_string()))?;

        if !status.success() {
            warn!(binary, code = ?status.code(), "external tool exited non-zero");
        }

        Ok(ExitOutcome { success: status.success(), code: status.code() })
    }
}
