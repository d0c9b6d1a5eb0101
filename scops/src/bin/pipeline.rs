// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! `pipeline` — drives one flightline through mask/geocorrect/reproject/
//! map (and its enabled band-math equations and plugins). Grounded on
//! `scops_process_apl_line.py`; invoked once per line by the submitter,
//! locally or via the cluster scheduler.

use std::sync::Arc;

use clap::Parser;

use scops::application::services::progress_watcher::ProgressWatcher;
use scops::application::use_cases::process_line::PipelineConfig;
use scops::application::use_cases::{PreprocessUseCase, ProcessLineUseCase};
use scops::infrastructure::adapters::IniOrderRepository;
use scops::infrastructure::config::Settings;
use scops::infrastructure::repositories::schema::initialize_database;
use scops::infrastructure::repositories::SqliteStatusStore;
use scops::infrastructure::runtime::ChildProcessToolRunner;
use scops::infrastructure::services::{builtin_plugins, load_reference_spectra, EnviRasterIo, LettreNotifier, StoredZipArchiver};
use scops::presentation::cli::PipelineArgs;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    scops_bootstrap::result_to_exit_code(run().await)
}

async fn run() -> anyhow::Result<()> {
    scops::infrastructure::logging::init();
    let args = PipelineArgs::parse();
    let settings = Settings::load(&args.settings)?;
    let command = args.into_command();

    let pool = initialize_database(&settings.database.url).await?;
    let order_repo = Arc::new(IniOrderRepository);
    let status_store = Arc::new(SqliteStatusStore::new(pool));
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
    let archiver = Arc::new(StoredZipArchiver::new());
    let raster_io = Arc::new(EnviRasterIo::default());
    let preprocess = Arc::new(PreprocessUseCase::new(raster_io.clone()));

    let reference_spectra = settings.reference_spectra_file.as_deref().map(load_reference_spectra).transpose()?;
    let plugins = builtin_plugins(raster_io, reference_spectra);

    let progress_watcher = Arc::new(ProgressWatcher::new(status_store.clone()));

    let config = PipelineConfig {
        temp_root: settings.pipeline.temp_root.clone(),
        separation_file: settings.pipeline.separation_file.clone(),
        bad_pixel_mask_file: settings.pipeline.bad_pixel_mask_file.clone(),
        error_address: settings.pipeline.error_address.clone(),
        error_bcc: settings.pipeline.error_bcc.clone(),
        download_base_url: settings.pipeline.download_base_url.clone(),
        delivery_root: settings.pipeline.delivery_root.clone(),
    };

    let use_case = ProcessLineUseCase::new(
        order_repo,
        status_store,
        tool_runner,
        notifier,
        archiver,
        preprocess,
        plugins,
        progress_watcher,
        config,
    );

    use_case.run(&command).await
}
