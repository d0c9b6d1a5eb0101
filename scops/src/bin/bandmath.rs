// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! `bandmath` — evaluates one band-math equation over a `.bil` file.
//! Grounded on `scops_bandmath.py`'s standalone CLI entry point; also
//! invoked internally by `pipeline` for each line's enabled equations.

use std::sync::Arc;

use clap::Parser;

use scops::application::use_cases::PreprocessUseCase;
use scops::infrastructure::services::EnviRasterIo;
use scops::presentation::cli::BandmathArgs;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    scops_bootstrap::result_to_exit_code(run().await)
}

async fn run() -> anyhow::Result<()> {
    scops::infrastructure::logging::init();
    let args = BandmathArgs::parse();
    let command = args.into_command();

    let raster_io = Arc::new(EnviRasterIo::default());
    let use_case = PreprocessUseCase::new(raster_io);
    let output = use_case.run(&command).await?;
    println!("{}", output.display());
    Ok(())
}
