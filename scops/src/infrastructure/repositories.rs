// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Repositories
//!
//! The durable `flightlines` table behind [`scops_domain::services::StatusStore`].

pub mod schema;
pub mod status_store_sqlite;

pub use status_store_sqlite::SqliteStatusStore;
