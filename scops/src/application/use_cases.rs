// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Use cases
//!
//! One module per business workflow, each a thin orchestrator over the
//! domain ports injected at construction. Each corresponds to one of the
//! four CLI binaries (§6): `intake`, `submitter`, `pipeline`, `bandmath`.

pub mod intake;
pub mod preprocess;
pub mod process_line;
pub mod submit_order;

pub use intake::IntakeUseCase;
pub use preprocess::PreprocessUseCase;
pub use process_line::{PipelineConfig, ProcessLineUseCase};
pub use submit_order::SubmitOrderUseCase;
