//! Pipeline orchestration
//!
//! - [`PipelineCoordinator`] - runs normalize, upload, or both
//! - [`NormalizeSummary`], [`PipelineSummary`] - per-run reporting

pub mod coordinator;
pub mod summary;

pub use coordinator::PipelineCoordinator;
pub use summary::{NormalizeSummary, PipelineSummary};
