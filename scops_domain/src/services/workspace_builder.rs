// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Workspace builder port
//!
//! Grounded on `web_qsub.py`'s workspace setup: creates the directory
//! tree of an order (or confirms it already exists), symlinks the order
//! file in, and generates the DEM artifact when the order does not
//! supply one. A DEM-coverage failure is not raised as an error — it is
//! reported through `Order::has_error` and a notification, leaving the
//! order in its waiting state for the operator or user to resolve.

use async_trait::async_trait;

use crate::entities::order::Order;
use crate::entities::workspace::Workspace;
use crate::error::ScopsError;

#[async_trait]
pub trait WorkspaceBuilder: Send + Sync {
    /// Ensures the workspace directory tree for `order` exists, checking
    /// write access up front, and ensures a DEM is present — generating
    /// one via the `DemGenerator` port when `order.dem_name` is unset.
    ///
    /// Returns `Ok(None)` when DEM generation failed with insufficient
    /// coverage: the implementation has already set `has_error` on the
    /// order file and sent the recoverable-error notification, and the
    /// caller should leave the order in its waiting state rather than
    /// dispatch any line. A write-access failure is fatal and surfaces as
    /// `Err`.
    async fn ensure(&self, order: &Order) -> Result<Option<Workspace>, ScopsError>;
}
