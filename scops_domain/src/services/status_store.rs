// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Status store port
//!
//! Abstraction over the durable `flightlines` table, grounded on
//! `status_db.py`'s five operations. Implementations open a short-lived
//! connection per call rather than holding a transaction across awaits.

use async_trait::async_trait;

use crate::entities::status_record::StatusRecord;
use crate::error::ScopsError;
use crate::value_objects::order_id::OrderId;
use crate::value_objects::progress::Progress;
use crate::value_objects::stage::Stage;

#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Inserts a new row; callers tolerate a uniqueness violation rather
    /// than treat it as fatal, matching the original's "idempotent by
    /// intent but not enforced" insert.
    async fn insert(&self, record: &StatusRecord) -> Result<(), ScopsError>;

    async fn get_stage(&self, processing_id: &OrderId, name: &str) -> Result<Stage, ScopsError>;

    async fn list(&self, processing_id: &OrderId) -> Result<Vec<StatusRecord>, ScopsError>;

    /// Sets `stage`, and the error flag whenever the stage text contains
    /// `"ERROR"`.
    async fn update_stage(&self, processing_id: &OrderId, name: &str, stage: Stage) -> Result<(), ScopsError>;

    async fn update_progress(
        &self,
        processing_id: &OrderId,
        name: &str,
        progress: Progress,
        filesize: crate::value_objects::file_size::FileSize,
        zipsize: crate::value_objects::file_size::FileSize,
    ) -> Result<(), ScopsError>;

    /// Atomically claims completion for an order: returns `true` exactly
    /// once across however many lines race to be the last one finished.
    /// Resolves the completion race noted as an Open Question — the
    /// original instead re-scans every status file with no
    /// synchronization.
    async fn claim_completion(&self, processing_id: &OrderId) -> Result<bool, ScopsError>;
}
