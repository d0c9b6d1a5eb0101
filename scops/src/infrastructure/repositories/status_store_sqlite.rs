// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite status store
//!
//! Implements [`StatusStore`] over the `flightlines`/`order_completion`
//! tables. Grounded on `status_db.py`'s five operations, plus
//! `claim_completion`'s CAS — a primitive the original has no equivalent
//! for, since it re-scans status files with no synchronization.

use async_trait::async_trait;
use sqlx::SqlitePool;

use scops_domain::entities::status_record::StatusRecord;
use scops_domain::error::ScopsError;
use scops_domain::services::StatusStore;
use scops_domain::value_objects::file_size::{FileSize, SizeUnit};
use scops_domain::value_objects::order_id::OrderId;
use scops_domain::value_objects::progress::Progress;
use scops_domain::value_objects::stage::Stage;

pub struct SqliteStatusStore {
    pool: SqlitePool,
}

impl SqliteStatusStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn unit_str(unit: SizeUnit) -> &'static str {
    match unit {
        SizeUnit::Mb => "MB",
        SizeUnit::Gb => "GB",
    }
}

fn parse_size(value: f64, unit: &str) -> FileSize {
    FileSize { value, unit: if unit == "GB" { SizeUnit::Gb } else { SizeUnit::Mb } }
}

#[async_trait]
impl StatusStore for SqliteStatusStore {
    async fn insert(&self, record: &StatusRecord) -> Result<(), ScopsError> {
        let result = sqlx::query(
            "INSERT INTO flightlines \
                (processing_id, name, stage, progress, filesize_value, filesize_unit, zipsize_value, zipsize_unit, flag, link) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.processing_id.as_str())
        .bind(&record.name)
        .bind(record.stage.as_str().into_owned())
        .bind(record.progress.value() as i64)
        .bind(record.filesize.value)
        .bind(unit_str(record.filesize.unit))
        .bind(record.zipsize.value)
        .bind(unit_str(record.zipsize.unit))
        .bind(record.flag as i64)
        .bind(&record.link)
        .execute(&self.pool)
        .await;

        match result {
            // A re-submitted order (`restart=true`) re-inserts rows for
            // lines already tracked; tolerated rather than fatal.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(()),
            Err(e) => Err(ScopsError::StatusStoreError(e.to_string())),
            Ok(_) => Ok(()),
        }
    }

    async fn get_stage(&self, processing_id: &OrderId, name: &str) -> Result<Stage, ScopsError> {
        let row: (String,) = sqlx::query_as("SELECT stage FROM flightlines WHERE processing_id = ? AND name = ?")
            .bind(processing_id.as_str())
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ScopsError::StatusStoreError(e.to_string()))?;
        Ok(Stage::parse(&row.0))
    }

    async fn list(&self, processing_id: &OrderId) -> Result<Vec<StatusRecord>, ScopsError> {
        let rows: Vec<(String, String, i64, f64, String, f64, String, i64, String)> = sqlx::query_as(
            "SELECT name, stage, progress, filesize_value, filesize_unit, zipsize_value, zipsize_unit, flag, link \
             FROM flightlines WHERE processing_id = ?",
        )
        .bind(processing_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScopsError::StatusStoreError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(name, stage, progress, fsv, fsu, zsv, zsu, flag, link)| StatusRecord {
                processing_id: processing_id.clone(),
                name,
                stage: Stage::parse(&stage),
                progress: Progress::new(progress as u8),
                filesize: parse_size(fsv, &fsu),
                zipsize: parse_size(zsv, &zsu),
                flag: flag != 0,
                link,
            })
            .collect())
    }

    async fn update_stage(&self, processing_id: &OrderId, name: &str, stage: Stage) -> Result<(), ScopsError> {
        let flag = stage.is_error();
        sqlx::query("UPDATE flightlines SET stage = ?, flag = ? WHERE processing_id = ? AND name = ?")
            .bind(stage.as_str().into_owned())
            .bind(flag as i64)
            .bind(processing_id.as_str())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| ScopsError::StatusStoreError(e.to_string()))?;
        Ok(())
    }

    async fn update_progress(
        &self,
        processing_id: &OrderId,
        name: &str,
        progress: Progress,
        filesize: FileSize,
        zipsize: FileSize,
    ) -> Result<(), ScopsError> {
        sqlx::query(
            "UPDATE flightlines SET progress = ?, filesize_value = ?, filesize_unit = ?, zipsize_value = ?, zipsize_unit = ? \
             WHERE processing_id = ? AND name = ?",
        )
        .bind(progress.value() as i64)
        .bind(filesize.value)
        .bind(unit_str(filesize.unit))
        .bind(zipsize.value)
        .bind(unit_str(zipsize.unit))
        .bind(processing_id.as_str())
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(|e| ScopsError::StatusStoreError(e.to_string()))?;
        Ok(())
    }

    async fn claim_completion(&self, processing_id: &OrderId) -> Result<bool, ScopsError> {
        sqlx::query("INSERT OR IGNORE INTO order_completion (processing_id, completion_claimed) VALUES (?, 0)")
            .bind(processing_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| ScopsError::StatusStoreError(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE order_completion SET completion_claimed = 1 WHERE processing_id = ? AND completion_claimed = 0",
        )
        .bind(processing_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| ScopsError::StatusStoreError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    use crate::infrastructure::repositories::schema::initialize_database;

    async fn store() -> SqliteStatusStore {
        let temp = NamedTempFile::new().unwrap();
        let db_url = format!("sqlite://{}", temp.path().display());
        drop(temp);
        let pool = initialize_database(&db_url).await.unwrap();
        SqliteStatusStore::new(pool)
    }

    fn order_id() -> OrderId {
        OrderId::parse("GB25_26_207").unwrap()
    }

    #[tokio::test]
    async fn insert_then_list_round_trips_a_record() {
        let store = store().await;
        let record = StatusRecord::new(order_id(), "f123", "http://example.test/f123");
        store.insert(&record).await.unwrap();

        let records = store.list(&order_id()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "f123");
        assert_eq!(records[0].stage, Stage::WaitingToProcess);
        assert!(!records[0].flag);
    }

    #[tokio::test]
    async fn inserting_the_same_line_twice_is_tolerated() {
        let store = store().await;
        let record = StatusRecord::new(order_id(), "f123", "http://example.test/f123");
        store.insert(&record).await.unwrap();
        store.insert(&record).await.unwrap();

        assert_eq!(store.list(&order_id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_stage_persists_and_sets_the_error_flag() {
        let store = store().await;
        let record = StatusRecord::new(order_id(), "f123", "http://example.test/f123");
        store.insert(&record).await.unwrap();

        store.update_stage(&order_id(), "f123", Stage::AplMask).await.unwrap();
        assert_eq!(store.get_stage(&order_id(), "f123").await.unwrap(), Stage::AplMask);

        store.update_stage(&order_id(), "f123", Stage::error("aplcorr")).await.unwrap();
        let records = store.list(&order_id()).await.unwrap();
        assert!(records[0].flag);
        assert_eq!(records[0].stage, Stage::error("aplcorr"));
    }

    #[tokio::test]
    async fn update_progress_persists_progress_and_sizes() {
        let store = store().await;
        let record = StatusRecord::new(order_id(), "f123", "http://example.test/f123");
        store.insert(&record).await.unwrap();

        store
            .update_progress(
                &order_id(),
                "f123",
                Progress::new(42),
                FileSize { value: 12.5, unit: SizeUnit::Mb },
                FileSize { value: 1.2, unit: SizeUnit::Gb },
            )
            .await
            .unwrap();

        let records = store.list(&order_id()).await.unwrap();
        assert_eq!(records[0].progress.value(), 42);
        assert_eq!(records[0].filesize, FileSize { value: 12.5, unit: SizeUnit::Mb });
        assert_eq!(records[0].zipsize, FileSize { value: 1.2, unit: SizeUnit::Gb });
    }

    #[tokio::test]
    async fn claim_completion_succeeds_exactly_once() {
        let store = store().await;
        assert!(store.claim_completion(&order_id()).await.unwrap());
        assert!(!store.claim_completion(&order_id()).await.unwrap());
        assert!(!store.claim_completion(&order_id()).await.unwrap());
    }

    #[tokio::test]
    async fn claim_completion_is_scoped_per_order() {
        let store = store().await;
        let other = OrderId::parse("GB25_26_208").unwrap();

        assert!(store.claim_completion(&order_id()).await.unwrap());
        assert!(store.claim_completion(&other).await.unwrap());
    }
}
