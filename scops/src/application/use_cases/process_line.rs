// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Process line use case
//!
//! The heart of the system, grounded on
//! `scops_process_apl_line.py::process_web_hyper_line`: drives one
//! flightline (and its enabled band-math equations and plugins) through
//! the four-stage pipeline, the cross-line zip barrier, and the
//! order-wide completion check.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use scops_domain::entities::line_processing_record::{plan_writeback, scratch_directory_to_remove, LineProcessingRecord};
use scops_domain::entities::order::Order;
use scops_domain::entities::workspace::Workspace;
use scops_domain::repositories::OrderRepository;
use scops_domain::services::notifier::{OrderComplete, StageError};
use scops_domain::services::plugin::Plugin;
use scops_domain::services::{Archiver, ExternalToolRunner, Notifier, StatusStore};
use scops_domain::value_objects::band_range::BandRange;
use scops_domain::value_objects::line_name::LineKey;
use scops_domain::value_objects::masking_policy::MaskingPolicy;
use scops_domain::value_objects::projection::Projection;
use scops_domain::value_objects::stage::Stage;
use scops_domain::ScopsError;

use crate::application::services::progress_watcher::ProgressWatcher;

use super::super::commands::{PreprocessCommand, ProcessLineCommand};
use super::preprocess::PreprocessUseCase;

/// Derives the per-pixel mask file `aplmask` reads as `-mask` for a given
/// level-1 input: `<stem>.bil` → `<stem>_mask.bil`, matching both the
/// line's own delivered mask and (since `PreprocessUseCase` names its
/// equation output's mask companion the same way) a band-math run's
/// derived mask.
fn mask_input_path(level1_input: &Path) -> PathBuf {
    let file_name = level1_input.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let mask_name = match file_name.strip_suffix(".bil") {
        Some(stem) => format!("{stem}_mask.bil"),
        None => format!("{file_name}_mask.bil"),
    };
    level1_input.with_file_name(mask_name)
}

/// The deterministic view-vector file `aplcorr` reads as `-vvfile`:
/// `<hyper_delivery>/sensor_fov_vectors/<sensor>_fov_fullccd_vectors.bil`.
fn view_vector_file(hyper_delivery: &Path, line_key: &LineKey) -> PathBuf {
    hyper_delivery.join("sensor_fov_vectors").join(format!("{}_fov_fullccd_vectors.bil", line_key.sensor().name()))
}

/// Mirrors the original's
/// `glob.glob(hyper_delivery + NAVIGATION_FOLDER + base_line_name + "*_nav_post_processed.bil")[0]`:
/// the first file under the delivery's navigation folder whose name is
/// prefixed by the line and carries the post-processed navigation suffix.
async fn find_nav_file(hyper_delivery: &Path, line_key: &LineKey) -> Result<PathBuf> {
    let nav_dir = hyper_delivery.join("navigation");
    let mut entries = tokio::fs::read_dir(&nav_dir).await.with_context(|| format!("reading navigation folder {}", nav_dir.display()))?;
    while let Some(entry) = entries.next_entry().await.context("reading navigation folder entry")? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(line_key.as_str()) && name.ends_with("_nav_post_processed.bil") {
            return Ok(entry.path());
        }
    }
    Err(anyhow::anyhow!("no post-processed navigation file found for {line_key} under {}", nav_dir.display()))
}

/// Static configuration the pipeline driver doesn't get from the CLI
/// surface or the order file — the deployment's temp root, separation
/// file, and error notification addresses.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// `Some` ⇒ stage outputs are written to scratch under this root and
    /// moved into the workspace on exit; `None` ⇒ written directly.
    pub temp_root: Option<PathBuf>,
    pub separation_file: PathBuf,
    pub bad_pixel_mask_file: Option<PathBuf>,
    pub error_address: String,
    pub error_bcc: Vec<String>,
    pub download_base_url: String,
    /// Root directory holding each sensor family's delivered level-1 files.
    pub delivery_root: PathBuf,
}

/// One pipeline invocation target: the main line itself, or a named
/// `eq_`/`plugin_` derivative of it.
struct RunSpec {
    display_name: String,
    band_list: BandRange,
    level1_input: PathBuf,
    skip_masking: bool,
    /// `aplmap -outputdatatype`: `"uint16"` for the main line, `"float32"`
    /// for equation/plugin derivatives (the original's un-overridden
    /// `process_web_hyper_line` default).
    data_type: &'static str,
}

pub struct ProcessLineUseCase {
    order_repo: Arc<dyn OrderRepository>,
    status_store: Arc<dyn StatusStore>,
    tool_runner: Arc<dyn ExternalToolRunner>,
    notifier: Arc<dyn Notifier>,
    archiver: Arc<dyn Archiver>,
    preprocess: Arc<PreprocessUseCase>,
    plugins: Vec<Arc<dyn Plugin>>,
    progress_watcher: Arc<ProgressWatcher>,
    config: PipelineConfig,
}

impl ProcessLineUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_repo: Arc<dyn OrderRepository>,
        status_store: Arc<dyn StatusStore>,
        tool_runner: Arc<dyn ExternalToolRunner>,
        notifier: Arc<dyn Notifier>,
        archiver: Arc<dyn Archiver>,
        preprocess: Arc<PreprocessUseCase>,
        plugins: Vec<Arc<dyn Plugin>>,
        progress_watcher: Arc<ProgressWatcher>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            order_repo,
            status_store,
            tool_runner,
            notifier,
            archiver,
            preprocess,
            plugins,
            progress_watcher,
            config,
        }
    }

    pub async fn run(&self, command: &ProcessLineCommand) -> Result<()> {
        let order = self.order_repo.load(&command.config_path).await.context("loading order file")?;
        let line_key = LineKey::parse(&command.line)?;
        let line_record = order
            .lines
            .get(&line_key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("line {line_key} not present in order {}", order.id))?;
        let workspace = Workspace::new(&command.workspace);

        // `OrderRepository::load` already resolves the free-text
        // `projection` field into a `Projection`, failing the whole
        // order at load time rather than deferring the
        // `ERROR - projection not identified` fatal to each line's
        // pipeline invocation the way the original script does.
        let projection = order.projection.clone();

        let hyper_delivery = self.config.delivery_root.join(line_key.sensor().delivery_folder_key());
        let level1_input = hyper_delivery.join(format!("{line_key}.bil"));

        let mut run_specs = Vec::new();

        if command.main_line {
            run_specs.push(RunSpec {
                display_name: line_key.as_str().to_string(),
                band_list: line_record.band_range.clone(),
                level1_input: level1_input.clone(),
                skip_masking: false,
                data_type: "uint16",
            });
        }

        if command.band_ratio {
            for eq_key in line_record.enabled_equations() {
                let suffix = eq_key.strip_prefix("eq_").unwrap_or(eq_key);
                let equation_text = order
                    .equations
                    .get(suffix)
                    .ok_or_else(|| anyhow::anyhow!("equation {suffix} enabled on {line_key} but not defined in order"))?;
                let output = self
                    .preprocess
                    .run(&PreprocessCommand {
                        equation: equation_text.clone(),
                        input: level1_input.clone(),
                        output_dir: Some(workspace.masked_output_dir()),
                        mask: Some(mask_input_path(&level1_input)),
                        name: Some(suffix.to_string()),
                    })
                    .await
                    .with_context(|| format!("evaluating equation {suffix} for line {line_key}"))?;
                // `write_band` always writes a single-band result, so the
                // equation output never has more than one layer — mirrors
                // `band_list = "1"` in the original rather than the
                // multi-layer `band_range` branch, which this port's
                // band-math evaluation can never take.
                run_specs.push(RunSpec {
                    display_name: format!("{line_key}_{suffix}"),
                    band_list: BandRange::parse("1")?,
                    level1_input: output,
                    skip_masking: false,
                    data_type: "float32",
                });
            }

            for plugin_key in line_record.enabled_plugins() {
                let name = plugin_key.strip_prefix("plugin_").unwrap_or(plugin_key);
                let plugin = self
                    .plugins
                    .iter()
                    .find(|p| p.name() == name)
                    .ok_or_else(|| anyhow::anyhow!("plugin {name} enabled on {line_key} but not registered"))?;
                let output = plugin
                    .run(&workspace.masked_output_dir(), &level1_input)
                    .await
                    .with_context(|| format!("running plugin {name} for line {line_key}"))?;
                run_specs.push(RunSpec {
                    display_name: format!("{line_key}_{name}"),
                    band_list: BandRange::parse("ALL")?,
                    level1_input: output,
                    skip_masking: true,
                    data_type: "float32",
                });
            }
        }

        for spec in &run_specs {
            self.run_one(&order, &workspace, &line_key, &level1_input, &line_record.masking, spec, &projection, command.resume)
                .await?;
        }

        self.maybe_complete_order(&order, &workspace).await;

        Ok(())
    }

    /// Writes the stage into both the status store and the per-line
    /// status file. Best-effort: failures are logged, never propagated —
    /// losing a progress update must not abort the pipeline.
    async fn set_stage(&self, order: &Order, workspace: &Workspace, display: &str, stage: Stage) {
        if let Err(e) = self.status_store.update_stage(&order.id, display, stage.clone()).await {
            warn!(line = display, error = %e, "status store stage update failed");
        }
        let text = format!("{display} = {}\n", stage.as_str());
        if let Err(e) = tokio::fs::write(workspace.status_file(display), text).await {
            warn!(line = display, error = %e, "status file write failed");
        }
    }

    async fn should_skip_stage(&self, order: &Order, display: &str, stage: &Stage, resume: bool, output_path: &Path) -> bool {
        if output_path.exists() {
            return true;
        }
        if !resume {
            return false;
        }
        let recorded = match self.status_store.get_stage(&order.id, display).await {
            Ok(stage) => stage,
            Err(_) => return false,
        };
        match (stage.ordinal(), recorded.ordinal()) {
            (Some(this), Some(recorded)) => recorded >= this,
            _ => false,
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_stage(
        &self,
        order: &Order,
        workspace: &Workspace,
        display: &str,
        stage: Stage,
        binary: &str,
        args: Vec<String>,
        output_path: &Path,
        log_path: &Path,
        resume: bool,
    ) -> Result<()> {
        if self.should_skip_stage(order, display, &stage, resume, output_path).await {
            info!(line = display, stage = %stage, "skipping stage, output already present");
            return Ok(());
        }

        self.set_stage(order, workspace, display, stage.clone()).await;

        let outcome = self.tool_runner.run(binary, &args, log_path).await.context("running external tool")?;

        if !outcome.success || !output_path.exists() {
            let error_stage = Stage::error(stage.as_str().into_owned());
            self.set_stage(order, workspace, display, error_stage).await;
            self.notifier
                .send_stage_error(&StageError {
                    line: display,
                    stage: &stage.as_str(),
                    detail: &format!("exit code {:?}", outcome.code),
                })
                .await
                .ok();
            return Err(ScopsError::stage_failed(stage.as_str(), format!("exit code {:?}", outcome.code)).into());
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_one(
        &self,
        order: &Order,
        workspace: &Workspace,
        line_key: &LineKey,
        main_lev1: &Path,
        masking_field: &str,
        spec: &RunSpec,
        projection: &Projection,
        resume: bool,
    ) -> Result<()> {
        let display = spec.display_name.as_str();

        tokio::fs::create_dir_all(workspace.logs_dir()).await.ok();
        let log_path = workspace.logs_dir().join(format!("{display}_log.txt"));
        tokio::fs::write(&log_path, b"").await.context("truncating log file")?;

        let masking_policy = if spec.skip_masking { MaskingPolicy::None } else { MaskingPolicy::parse(masking_field)? };

        let is_tmp = self.config.temp_root.is_some();
        let (processing_location, output_location) = if let Some(temp_root) = &self.config.temp_root {
            let scratch = temp_root.join(format!("{}_{display}", order.id));
            tokio::fs::create_dir_all(&scratch).await.context("creating scratch directory")?;
            (scratch, workspace.root().to_path_buf())
        } else {
            (workspace.root().to_path_buf(), workspace.root().to_path_buf())
        };

        let record = LineProcessingRecord::new(processing_location, output_location, display, projection.token(), is_tmp);

        let writeback_record = record.clone();
        let writeback_guard = scopeguard::guard((), move |_| {
            for (scratch, finals) in plan_writeback(&writeback_record) {
                if scratch.exists() {
                    if let Some(parent) = finals.parent() {
                        let _ = std::fs::create_dir_all(parent);
                    }
                    let _ = std::fs::rename(&scratch, &finals);
                }
            }
            if let Some(dir) = scratch_directory_to_remove(&writeback_record) {
                let _ = std::fs::remove_dir_all(dir);
            }
        });

        let cancel = CancellationToken::new();
        let watcher_handle = self.progress_watcher.spawn(
            order.id.clone(),
            display.to_string(),
            log_path.clone(),
            record.zipname().to_path_buf(),
            cancel.clone(),
        );

        let outcome = self
            .execute_pipeline(order, workspace, line_key, main_lev1, &record, &masking_policy, spec, projection, &log_path, resume)
            .await;

        cancel.cancel();
        let _ = watcher_handle.await;

        drop(writeback_guard);

        outcome
    }

    #[allow(clippy::too_many_arguments)]
    async fn execute_pipeline(
        &self,
        order: &Order,
        workspace: &Workspace,
        line_key: &LineKey,
        main_lev1: &Path,
        record: &LineProcessingRecord,
        masking_policy: &MaskingPolicy,
        spec: &RunSpec,
        projection: &Projection,
        log_path: &Path,
        resume: bool,
    ) -> Result<()> {
        let display = spec.display_name.as_str();
        let hyper_delivery = self.config.delivery_root.join(line_key.sensor().delivery_folder_key());

        // Stage 1: mask.
        if masking_policy.skips_masking_stage() {
            if !record.masked_file().exists() {
                tokio::fs::copy(&spec.level1_input, record.masked_file())
                    .await
                    .context("copying unmasked input as masked output")?;
            }
        } else {
            let mut args = vec!["-lev1".to_string(), spec.level1_input.display().to_string()];
            let flags: BTreeSet<&'static str> = masking_policy.numeric_flags();
            if !flags.is_empty() {
                args.push("-flags".to_string());
                args.extend(flags.into_iter().map(str::to_string));
            }
            if masking_policy.wants_only_mask_methods() {
                if let Some(badpix) = &self.config.bad_pixel_mask_file {
                    if badpix.exists() {
                        args.push("-onlymaskmethods".to_string());
                        args.push(badpix.display().to_string());
                        args.extend(masking_policy.ccd_letters().into_iter().map(|c| c.to_string()));
                    }
                }
            }
            args.push("-mask".to_string());
            args.push(mask_input_path(&spec.level1_input).display().to_string());
            args.push("-output".to_string());
            args.push(record.masked_file().display().to_string());
            self.run_stage(order, workspace, display, Stage::AplMask, "aplmask", args, record.masked_file(), log_path, resume)
                .await?;
        }

        // Stage 2: geocorrect. `-lev1file` is always the flightline's own
        // delivered level-1 file, not `spec.level1_input` — the original
        // derives navigation/geometry from the main line even when masking
        // an equation's or plugin's band-math output.
        let dem_path = workspace.dem_dir().join(order.dem_name.clone().unwrap_or_else(|| format!("{}.dem.bil", order.id)));
        let nav_file = find_nav_file(&hyper_delivery, line_key).await?;
        let mut args = vec![
            "-lev1file".to_string(),
            main_lev1.display().to_string(),
            "-navfile".to_string(),
            nav_file.display().to_string(),
            "-vvfile".to_string(),
            view_vector_file(&hyper_delivery, line_key).display().to_string(),
            "-dem".to_string(),
            dem_path.display().to_string(),
            "-igmfile".to_string(),
            record.igm_file().display().to_string(),
        ];
        if projection.requires_separation_file() {
            args.push("-sepfile".to_string());
            args.push(self.config.separation_file.display().to_string());
        }
        self.run_stage(order, workspace, display, Stage::AplCorr, "aplcorr", args, record.igm_file(), log_path, resume).await?;

        // Stage 3: reproject.
        let mut args = vec![
            "-inproj".to_string(),
            "latlong".to_string(),
            "WGS84".to_string(),
            "-igm".to_string(),
            record.igm_file().display().to_string(),
            "-output".to_string(),
            record.igm_transformed_file().display().to_string(),
            "-outproj".to_string(),
        ];
        args.extend(projection.outproj_args());
        if projection.requires_separation_file() {
            args.push(self.config.separation_file.display().to_string());
        }
        self.run_stage(
            order,
            workspace,
            display,
            Stage::AplTran,
            "apltran",
            args,
            record.igm_transformed_file(),
            log_path,
            resume,
        )
        .await?;

        // Stage 4: map.
        let (pixel_x, pixel_y) = order.pixel_size;
        let mut args = vec![
            "-igm".to_string(),
            record.igm_transformed_file().display().to_string(),
            "-lev1".to_string(),
            record.masked_file().display().to_string(),
            "-pixelsize".to_string(),
            pixel_x.to_string(),
            pixel_y.to_string(),
            "-bandlist".to_string(),
            spec.band_list.as_bandlist_arg().to_string(),
            "-interpolation".to_string(),
            order.interpolation.clone(),
            "-mapname".to_string(),
            record.mapname().display().to_string(),
            "-buffersize".to_string(),
            "4096".to_string(),
            "-outputlevel".to_string(),
            "verbose".to_string(),
            "-outputdatatype".to_string(),
            spec.data_type.to_string(),
        ];
        if order.aplmap_ignore_freespace {
            args.push("-ignorediskspace".to_string());
        }
        self.run_stage(order, workspace, display, Stage::AplMap, "aplmap", args, record.mapname(), log_path, resume).await?;

        // Stage 5: the cross-line zip barrier, then the per-line zip.
        self.run_zip_stage(order, workspace, display, record).await
    }

    async fn run_zip_stage(&self, order: &Order, workspace: &Workspace, display: &str, record: &LineProcessingRecord) -> Result<()> {
        self.set_stage(order, workspace, display, Stage::WaitingToZip).await;
        self.wait_for_exclusive_zip_slot(workspace).await;
        self.set_stage(order, workspace, display, Stage::Zipping).await;

        let files = vec![record.mapname().to_path_buf(), record.mapped_header_file().to_path_buf()];
        match self.archiver.create_zip(record.zipname(), &files).await {
            Ok(()) if record.zipname().exists() => {
                self.set_stage(order, workspace, display, Stage::Complete).await;
            }
            Ok(()) => {
                warn!(line = display, "zip reported success but produced no output; zip flag left false");
            }
            Err(e) => {
                warn!(line = display, error = %e, "zip creation failed; zip flag left false");
            }
        }
        Ok(())
    }

    /// Polls every status file in the workspace once a second until none
    /// is mid-zip — enforces at most one line zipping concurrently.
    async fn wait_for_exclusive_zip_slot(&self, workspace: &Workspace) {
        loop {
            let mut any_zipping = false;
            if let Ok(mut entries) = tokio::fs::read_dir(workspace.status_dir()).await {
                while let Ok(Some(entry)) = entries.next_entry().await {
                    if let Ok(text) = tokio::fs::read_to_string(entry.path()).await {
                        if text.contains("zipping") {
                            any_zipping = true;
                            break;
                        }
                    }
                }
            }
            if !any_zipping {
                return;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }

    /// After a zip, checks whether the whole order is done and, if so,
    /// claims the completion side effects exactly once across every
    /// racing line.
    async fn maybe_complete_order(&self, order: &Order, workspace: &Workspace) {
        let mut texts = Vec::new();
        match tokio::fs::read_dir(workspace.status_dir()).await {
            Ok(mut entries) => {
                while let Ok(Some(entry)) = entries.next_entry().await {
                    if let Ok(text) = tokio::fs::read_to_string(entry.path()).await {
                        texts.push(text);
                    }
                }
            }
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "could not read status directory for completion check");
                return;
            }
        }

        let all_done = scops_domain::aggregates::processing_run::all_lines_complete_or_skipped(texts.iter().map(|s| s.as_str()));
        if !all_done {
            return;
        }

        match self.status_store.claim_completion(&order.id).await {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "completion claim failed");
                return;
            }
        }

        if let Err(e) = self.build_master_zip_and_notify(order, workspace).await {
            warn!(order_id = %order.id, error = %e, "master zip / completion notification failed");
        }
    }

    async fn build_master_zip_and_notify(&self, order: &Order, workspace: &Workspace) -> Result<()> {
        let mapped_dir = workspace.mapped_dir();
        let mut members = Vec::new();
        let mut entries = tokio::fs::read_dir(&mapped_dir).await.context("reading mapped directory")?;
        while let Some(entry) = entries.next_entry().await.context("walking mapped directory")? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("zip") {
                members.push(path);
            }
        }

        let manifest: String = members.iter().map(|p| format!("{}\n", p.display())).collect();
        tokio::fs::write(mapped_dir.join("zip_contents.txt"), manifest).await.context("writing zip manifest")?;

        let master_zip_name = format!("{}_{}{}.zip", order.project_code, order.year, order.julian_day);
        let master_zip_path = mapped_dir.join(master_zip_name);
        self.archiver.create_zip(&master_zip_path, &members).await.context("creating master zip")?;

        let link = format!(
            "{}/processor/downloads/{}/{}?project={}",
            self.config.download_base_url,
            order.id,
            master_zip_path.file_name().and_then(|n| n.to_str()).unwrap_or_default(),
            order.project_code
        );
        self.notifier
            .send_order_complete(&OrderComplete { recipient: &order.email, project_code: &order.project_code, download_link: &link })
            .await
            .context("sending order-complete notification")?;

        Ok(())
    }
}
