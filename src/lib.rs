// Conversion Relay - Offline Conversion Normalizer and Uploader
// Copyright (c) 2025 Conversion Relay Contributors
// Licensed under the MIT License

//! # Conversion Relay - Offline Conversion Normalizer and Uploader
//!
//! Conversion Relay cleans offline conversion exports (CRM or point-of-sale
//! sales attributed to ad clicks) and uploads them to an ads API with bounded
//! retries and exponential backoff, keeping an audit log of every outcome.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Normalizing** raw exports: click-ID column mapping, permissive timestamp
//!   parsing, filtering and value bucketing
//! - **Uploading** clean records through a pluggable delivery endpoint
//! - **Retrying** failed attempts with a doubling backoff and per-attempt timeout
//! - **Auditing** every record's terminal status in a single CSV schema
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (normalize, upload, pipeline)
//! - [`adapters`] - CSV artifacts and delivery endpoints
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use conversion_relay::config::resolve_config;
//! use conversion_relay::core::pipeline::PipelineCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = resolve_config(None)?;
//!     let coordinator = PipelineCoordinator::new(config)?;
//!
//!     let summary = coordinator.run().await?;
//!
//!     println!("Uploaded {} conversions", summary.upload.successful_uploads);
//!     Ok(())
//! }
//! ```
//!
//! ## Retry Behaviour
//!
//! A record gets at most `max_attempts` delivery attempts. After failed
//! attempt `k` the uploader sleeps `initial_backoff * 2^(k - 1)`, capped only
//! when `upload.max_backoff_ms` is set; there is no sleep after the last
//! attempt:
//!
//! ```rust
//! use conversion_relay::core::upload::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::default();
//! assert_eq!(
//!     policy.schedule(),
//!     vec![Duration::from_secs(1), Duration::from_secs(2)]
//! );
//! ```
//!
//! ## Plugging In a Real Endpoint
//!
//! The uploader only depends on [`adapters::delivery::ConversionDelivery`]:
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use conversion_relay::adapters::delivery::ConversionDelivery;
//! use conversion_relay::config::RelayConfig;
//! use conversion_relay::core::pipeline::PipelineCoordinator;
//! use conversion_relay::domain::{ActionId, CleanConversionRecord, DeliveryError};
//! use std::sync::Arc;
//!
//! struct AdsApiClient;
//!
//! #[async_trait]
//! impl ConversionDelivery for AdsApiClient {
//!     async fn attempt_delivery(
//!         &self,
//!         record: &CleanConversionRecord,
//!     ) -> Result<ActionId, DeliveryError> {
//!         Err(DeliveryError::ConnectionFailed(format!("offline: {}", record.click_id())))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "ads-api"
//!     }
//! }
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = PipelineCoordinator::with_delivery(RelayConfig::default(), Arc::new(AdsApiClient))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fatal conditions use [`domain::RelayError`]. Per-record problems never
//! surface as errors: dropped rows are counted in the normalize report and
//! failed uploads become `FAILURE` rows in the audit log.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
