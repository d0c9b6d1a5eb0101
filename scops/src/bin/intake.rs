// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! `intake` — one pass over the order directory, submitting every order
//! ready for it. Grounded on `scops_processing_cron.py`; the repetition
//! comes from an OS cron schedule, not a loop here.

use std::sync::Arc;

use clap::Parser;

use scops::application::use_cases::{IntakeUseCase, SubmitOrderUseCase};
use scops::infrastructure::adapters::{ClusterLineSubmitter, FilesystemWorkspaceBuilder, IniOrderRepository};
use scops::infrastructure::config::Settings;
use scops::infrastructure::repositories::schema::initialize_database;
use scops::infrastructure::runtime::ChildProcessToolRunner;
use scops::infrastructure::services::{AplDemGenerator, LettreNotifier};
use scops::presentation::cli::IntakeArgs;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    scops_bootstrap::result_to_exit_code(run().await)
}

async fn run() -> anyhow::Result<()> {
    scops::infrastructure::logging::init();
    let args = IntakeArgs::parse();
    let settings = Settings::load(&args.settings)?;
    let command = args.into_command(settings.order_dir.clone());

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
    let dem_generator = Arc::new(AplDemGenerator::new(tool_runner.clone(), settings.log_dir.clone()));
    let workspace_builder = Arc::new(FilesystemWorkspaceBuilder::new(settings.workspace_base.clone(), dem_generator, notifier.clone()));
    let line_submitter = Arc::new(ClusterLineSubmitter::new(settings.submission.clone(), settings.pipeline_binary.clone()));
    let status_store = Arc::new(scops::infrastructure::repositories::SqliteStatusStore::new(pool));

    let submitter = Arc::new(SubmitOrderUseCase::new(
        order_repo.clone(),
        status_store,
        notifier,
        workspace_builder,
        line_submitter,
        settings.pipeline.download_base_url.clone(),
    ));

    let intake = IntakeUseCase::new(order_repo, submitter);
    intake.run_once(&command.order_dir).await
}
