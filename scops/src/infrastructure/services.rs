// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Services
//!
//! Adapters for the remaining domain ports: e-mail, DEM generation, the
//! plugin registry, raster I/O, and zip packaging.

pub mod dem_adapter;
pub mod plugin_registry;
pub mod raster_io_adapter;
pub mod smtp_notifier;
pub mod zipper;

pub use dem_adapter::AplDemGenerator;
pub use plugin_registry::{builtin_plugins, load_reference_spectra};
pub use raster_io_adapter::EnviRasterIo;
pub use smtp_notifier::LettreNotifier;
pub use zipper::StoredZipArchiver;
