//! # SCOPS Domain
//!
//! The pure business logic of flightline order processing: value objects,
//! entities, domain services, and the repository/port traits that
//! infrastructure implements. Independent of databases, process
//! execution, and the network — nothing in this crate awaits an I/O
//! operation it doesn't abstract behind a trait.
//!
//! ## Module structure
//!
//! - [`value_objects`]: immutable, self-validating types (`OrderId`,
//!   `MaskingPolicy`, `Projection`, `Stage`, `Progress`, `FileSize`,
//!   `BandRange`, `LineKey`).
//! - [`entities`]: identity-bearing objects built from value objects
//!   (`Order`, `LineRecord`, `StatusRecord`, `LineProcessingRecord`,
//!   `Workspace`).
//! - [`aggregates`]: rules spanning more than one line of an order.
//! - [`services`]: domain service ports (`StatusStore`, `Notifier`,
//!   `ExternalToolRunner`, `DemGenerator`, `Plugin`, `LineSubmitter`,
//!   `WorkspaceBuilder`, `RasterIo`, `Archiver`) plus the one pure
//!   computation that needs no port, `band_math`.
//! - [`repositories`]: the `OrderRepository` port.
//! - [`events`]: `ProcessingEvent`, raised by the pipeline driver.
//! - [`error`]: the domain-wide [`ScopsError`].

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::{LineProcessingRecord, LineRecord, Order, StatusRecord, SubmissionFlags, Workspace};
pub use error::ScopsError;
pub use events::ProcessingEvent;
pub use value_objects::{
    overall_progress, BandRange, FileSize, Hemisphere, LineKey, MaskingPolicy, OrderId, Progress, Projection,
    Sensor, SizeUnit, Stage, CANONICAL_SEQUENCE,
};
