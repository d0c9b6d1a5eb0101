// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end test of the submit-order workflow (§4.4, steps 1-6):
//! a real `.cfg` file on disk, a real SQLite status store, and fakes for
//! the workspace/notification/dispatch ports — grounded on
//! `web_qsub.py`'s overall shape without shelling out to `qsub` or SMTP.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::tempdir;

use scops::application::use_cases::SubmitOrderUseCase;
use scops::infrastructure::adapters::IniOrderRepository;
use scops::infrastructure::repositories::schema::initialize_database;
use scops::infrastructure::repositories::SqliteStatusStore;
use scops_domain::entities::order::Order;
use scops_domain::entities::workspace::Workspace;
use scops_domain::error::ScopsError;
use scops_domain::repositories::OrderRepository;
use scops_domain::services::notifier::{OrderComplete, OrderStarted, PreprocessingError, StageError};
use scops_domain::services::{LineSubmission, LineSubmitter, Notifier, WorkspaceBuilder};
use scops_domain::value_objects::order_id::OrderId;

const FIXTURE_CFG: &str = r#"
project_code = GB25
year = 25
julianday = 207
sortie = 01
output_folder = GB25_26_207
projection = UTM zone 30N
source_folder = /data/raw/GB25_26_207
dem = generated
email = researcher@example.com
pixel_size_x = 2.0
pixel_size_y = 2.0
interpolation = nearest neighbour
submitted = false
confirmed = true
status_email_sent = false

[f123]
process = true
masking = none
bandlist = ALL
"#;

/// Creates the workspace's directory tree on disk and hands back a real
/// `Workspace`, mirroring `FilesystemWorkspaceBuilder::ensure` without a
/// DEM generator dependency.
struct FakeWorkspaceBuilder {
    base: PathBuf,
}

#[async_trait]
impl WorkspaceBuilder for FakeWorkspaceBuilder {
    async fn ensure(&self, order: &Order) -> Result<Option<Workspace>, ScopsError> {
        let workspace = Workspace::for_order(&self.base, &order.id);
        for dir in workspace.all_subdirectories() {
            tokio::fs::create_dir_all(&dir).await.map_err(|e| ScopsError::IoError(e.to_string()))?;
        }
        Ok(Some(workspace))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    order_started: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_order_started(&self, message: &OrderStarted<'_>) -> Result<(), ScopsError> {
        self.order_started.lock().unwrap().push(message.recipient.to_string());
        Ok(())
    }

    async fn send_confirmation(&self, _recipient: &str, _project_code: &str) -> Result<(), ScopsError> {
        Ok(())
    }

    async fn send_stage_error(&self, _message: &StageError<'_>) -> Result<(), ScopsError> {
        Ok(())
    }

    async fn send_preprocessing_error(&self, _message: &PreprocessingError<'_>) -> Result<(), ScopsError> {
        Ok(())
    }

    async fn send_order_complete(&self, _message: &OrderComplete<'_>) -> Result<(), ScopsError> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingLineSubmitter {
    submissions: AtomicUsize,
}

#[async_trait]
impl LineSubmitter for CountingLineSubmitter {
    async fn submit_line(&self, _submission: &LineSubmission) -> Result<(), ScopsError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn submit_writes_status_rows_notifies_and_dispatches_every_processing_line() {
    let order_dir = tempdir().unwrap();
    let order_path = order_dir.path().join("GB25_26_207.cfg");
    tokio::fs::write(&order_path, FIXTURE_CFG).await.unwrap();

    let db_dir = tempdir().unwrap();
    let db_url = format!("sqlite://{}", db_dir.path().join("status.db").display());
    let pool = initialize_database(&db_url).await.unwrap();
    let status_store = std::sync::Arc::new(SqliteStatusStore::new(pool));

    let order_repo = std::sync::Arc::new(IniOrderRepository::new());
    let notifier = std::sync::Arc::new(RecordingNotifier::default());
    let workspace_builder = std::sync::Arc::new(FakeWorkspaceBuilder { base: db_dir.path().join("workspaces") });
    let line_submitter = std::sync::Arc::new(CountingLineSubmitter::default());

    let use_case = SubmitOrderUseCase::new(
        order_repo.clone(),
        status_store.clone(),
        notifier.clone(),
        workspace_builder,
        line_submitter.clone(),
        "https://scops.example.org",
    );

    use_case.submit(&order_path).await.unwrap();

    // Step 3: submitted=true persisted so a second intake pass skips it.
    let reloaded = order_repo.load(&order_path).await.unwrap();
    assert!(reloaded.flags.submitted);

    // Step 5: exactly one order-started e-mail, to the order's submitter.
    assert_eq!(notifier.order_started.lock().unwrap().as_slice(), ["researcher@example.com"]);

    // Step 6: the one processing line was dispatched.
    assert_eq!(line_submitter.submissions.load(Ordering::SeqCst), 1);

    // Step 4: the line's status row exists and is readable back.
    let order_id = OrderId::parse("GB25_26_207").unwrap();
    let records = status_store.list(&order_id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "f123");
}

#[tokio::test]
async fn resubmitting_an_already_submitted_order_does_not_resend_the_started_email() {
    let order_dir = tempdir().unwrap();
    let order_path = order_dir.path().join("GB25_26_207.cfg");
    let already_sent = FIXTURE_CFG.replace("status_email_sent = false", "status_email_sent = true");
    tokio::fs::write(&order_path, already_sent).await.unwrap();

    let db_dir = tempdir().unwrap();
    let db_url = format!("sqlite://{}", db_dir.path().join("status.db").display());
    let pool = initialize_database(&db_url).await.unwrap();
    let status_store = std::sync::Arc::new(SqliteStatusStore::new(pool));

    let order_repo = std::sync::Arc::new(IniOrderRepository::new());
    let notifier = std::sync::Arc::new(RecordingNotifier::default());
    let workspace_builder = std::sync::Arc::new(FakeWorkspaceBuilder { base: db_dir.path().join("workspaces") });
    let line_submitter = std::sync::Arc::new(CountingLineSubmitter::default());

    let use_case = SubmitOrderUseCase::new(
        order_repo,
        status_store,
        notifier.clone(),
        workspace_builder,
        line_submitter,
        "https://scops.example.org",
    );

    use_case.submit(&order_path).await.unwrap();

    assert!(notifier.order_started.lock().unwrap().is_empty());
}
