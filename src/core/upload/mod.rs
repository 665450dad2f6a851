//! Conversion upload
//!
//! - [`ConversionActionRegistry`] - conversion actions known for the run
//! - [`RetryPolicy`] - attempt bound and exponential backoff schedule
//! - [`Uploader`] - per-record attempt loop over a delivery endpoint
//! - [`UploadSummary`] - aggregate counters for reporting

pub mod registry;
pub mod retry;
pub mod summary;
pub mod uploader;

pub use registry::ConversionActionRegistry;
pub use retry::RetryPolicy;
pub use summary::UploadSummary;
pub use uploader::{Uploader, DEFAULT_ATTEMPT_TIMEOUT};
