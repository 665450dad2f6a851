//! Core business logic for the relay.
//!
//! # Modules
//!
//! - [`normalize`] - Raw export cleaning, timestamp parsing and value bucketing
//! - [`upload`] - Retry state machine, backoff policy and action registry
//! - [`pipeline`] - Stage orchestration and run summaries
//!
//! # Workflow
//!
//! 1. **Read**: Load the raw export with configurable column names
//! 2. **Normalize**: Filter, parse timestamps, bucket values
//! 3. **Stage**: Write the clean file
//! 4. **Register**: Ensure the conversion action exists
//! 5. **Upload**: Deliver each record with bounded retries and backoff
//! 6. **Audit**: Write one outcome row per clean record
//! 7. **Report**: Log and print the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use conversion_relay::config::load_config;
//! use conversion_relay::core::pipeline::PipelineCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("relay.toml")?;
//! let coordinator = PipelineCoordinator::new(config)?;
//!
//! let summary = coordinator.run().await?;
//!
//! println!("Valid: {}", summary.normalize.report.valid_records);
//! println!("Uploaded: {}", summary.upload.successful_uploads);
//! println!("Failed: {}", summary.upload.failed_uploads);
//! # Ok(())
//! # }
//! ```

pub mod normalize;
pub mod pipeline;
pub mod upload;
