// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! Parsing and write-back of the order `.cfg` file, grounded on
//! `web_qsub.py`'s direct `ConfigParser` reads: per-line band-math and
//! plugin selectors, and the idempotent `submitted`/`status_email_sent`
//! write-backs the submitter performs.

use tempfile::tempdir;

use scops::infrastructure::adapters::IniOrderRepository;
use scops_domain::repositories::OrderRepository;

const FIXTURE_CFG: &str = r#"
project_code = GB25
year = 25
julianday = 207
output_folder = GB25_26_207
projection = UKBNG
source_folder = /data/raw/GB25_26_207
dem = generated
email = researcher@example.com
eq_ndvi = (band4 - band3) / (band4 + band3)
submitted = false
confirmed = true
status_email_sent = false

[f123]
process = true
masking = none
bandlist = 1-10
eq_ndvi = true
plugin_spectral_angle = false

[f456]
process = false
masking = none
bandlist = ALL
"#;

#[tokio::test]
async fn parses_lines_equations_and_selectors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("order.cfg");
    tokio::fs::write(&path, FIXTURE_CFG).await.unwrap();

    let repo = IniOrderRepository::new();
    let order = repo.load(&path).await.unwrap();

    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.equations.get("ndvi").map(String::as_str), Some("(band4 - band3) / (band4 + band3)"));

    let f123 = order.lines.get(&scops_domain::value_objects::line_name::LineKey::parse("f123").unwrap()).unwrap();
    assert!(f123.process);
    assert_eq!(f123.enabled_equations().collect::<Vec<_>>(), vec!["eq_ndvi"]);
    assert!(f123.enabled_plugins().next().is_none());
    assert!(f123.requires_processing());

    let f456 = order.lines.get(&scops_domain::value_objects::line_name::LineKey::parse("f456").unwrap()).unwrap();
    assert!(!f456.requires_processing());
}

#[tokio::test]
async fn mark_submitted_and_mark_status_email_sent_are_idempotent_and_persist() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("order.cfg");
    tokio::fs::write(&path, FIXTURE_CFG).await.unwrap();

    let repo = IniOrderRepository::new();

    repo.mark_submitted(&path).await.unwrap();
    repo.mark_submitted(&path).await.unwrap();
    repo.mark_status_email_sent(&path).await.unwrap();

    let order = repo.load(&path).await.unwrap();
    assert!(order.flags.submitted);
    assert!(order.flags.status_email_sent);
    // Untouched fields survive the rewrite.
    assert_eq!(order.project_code, "GB25");
    assert_eq!(order.lines.len(), 2);
}

#[tokio::test]
async fn list_order_files_only_returns_cfg_files_sorted() {
    let dir = tempdir().unwrap();
    tokio::fs::write(dir.path().join("b.cfg"), FIXTURE_CFG).await.unwrap();
    tokio::fs::write(dir.path().join("a.cfg"), FIXTURE_CFG).await.unwrap();
    tokio::fs::write(dir.path().join("notes.txt"), "ignore me").await.unwrap();

    let repo = IniOrderRepository::new();
    let files = repo.list_order_files(dir.path()).await.unwrap();

    let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect();
    assert_eq!(names, vec!["a.cfg", "b.cfg"]);
}
