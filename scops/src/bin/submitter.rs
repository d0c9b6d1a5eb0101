// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! `submitter` — turns one confirmed order into a workspace and a
//! fanned-out dispatch of its lines. Grounded on `web_qsub.py`.

use std::sync::Arc;

use clap::Parser;

use scops::application::use_cases::SubmitOrderUseCase;
use scops::infrastructure::adapters::{ClusterLineSubmitter, FilesystemWorkspaceBuilder, IniOrderRepository};
use scops::infrastructure::config::{Settings, SubmissionMode};
use scops::infrastructure::repositories::schema::initialize_database;
use scops::infrastructure::repositories::SqliteStatusStore;
use scops::infrastructure::runtime::ChildProcessToolRunner;
use scops::infrastructure::services::{AplDemGenerator, LettreNotifier};
use scops::presentation::cli::SubmitterArgs;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    scops_bootstrap::result_to_exit_code(run().await)
}

async fn run() -> anyhow::Result<()> {
    scops::infrastructure::logging::init();
    let args = SubmitterArgs::parse();
    let settings = Settings::load(&args.settings)?;
    let local_override = args.local;
    let command = args.into_command();

    let pool = initialize_database(&settings.database.url).await?;
    let order_repo = Arc::new(IniOrderRepository);
    let notifier = Arc::new(LettreNotifier::new(
        &settings.smtp.host,
        settings.smtp.port,
        &settings.smtp.username,
        &settings.smtp.password,
        &settings.smtp.from_address,
        settings.pipeline.error_address.clone(),
        settings.pipeline.error_bcc.clone(),
    )?);
    let tool_runner = Arc::new(ChildProcessToolRunner::new(settings.pipeline.tool_bin_dir.clone()));
    let dem_generator = Arc::new(AplDemGenerator::new(tool_runner, settings.log_dir.clone()));
    let workspace_builder = Arc::new(FilesystemWorkspaceBuilder::new(settings.workspace_base.clone(), dem_generator, notifier.clone()));

    let mode = if local_override { SubmissionMode::Local } else { settings.submission.clone() };
    let line_submitter = Arc::new(ClusterLineSubmitter::new(mode, settings.pipeline_binary.clone()));
    let status_store = Arc::new(SqliteStatusStore::new(pool));

    let use_case = SubmitOrderUseCase::new(
        order_repo,
        status_store,
        notifier,
        workspace_builder,
        line_submitter,
        settings.pipeline.download_base_url.clone(),
    );

    use_case.submit(&command.order_path).await
}
