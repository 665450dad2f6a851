//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output on stderr
//! - Configurable log levels, overridable with `RUST_LOG`
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use conversion_relay::logging::init_logging;
//! use conversion_relay::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Relay started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a pipeline stage
///
/// # Example
///
/// ```no_run
/// use conversion_relay::log_stage_start;
///
/// log_stage_start!("normalize", "run-1", "data/conversions.csv");
/// ```
#[macro_export]
macro_rules! log_stage_start {
    ($stage:expr, $run_id:expr, $input:expr) => {
        tracing::info!(
            stage = $stage,
            run_id = %$run_id,
            input = %$input,
            "Starting stage"
        );
    };
}

/// Log a single delivery attempt for one record
///
/// Success is logged at INFO, failure at WARN.
///
/// # Example
///
/// ```no_run
/// use conversion_relay::log_delivery_attempt;
///
/// let result: Result<&str, &str> = Err("rejected");
/// log_delivery_attempt!("ABC123", 1, 3, result);
/// ```
#[macro_export]
macro_rules! log_delivery_attempt {
    ($gclid:expr, $attempt:expr, $max_attempts:expr, $result:expr) => {
        match &$result {
            Ok(action_id) => tracing::info!(
                gclid = %$gclid,
                attempt = $attempt,
                max_attempts = $max_attempts,
                action_id = %action_id,
                "Conversion uploaded"
            ),
            Err(reason) => tracing::warn!(
                gclid = %$gclid,
                attempt = $attempt,
                max_attempts = $max_attempts,
                reason = %reason,
                "Upload attempt failed"
            ),
        }
    };
}

/// Log a scheduled retry
///
/// # Example
///
/// ```no_run
/// use conversion_relay::log_retry_attempt;
/// use std::time::Duration;
///
/// log_retry_attempt!("ABC123", 2, 3, Duration::from_secs(1));
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($gclid:expr, $next_attempt:expr, $max_attempts:expr, $delay:expr) => {
        tracing::debug!(
            gclid = %$gclid,
            next_attempt = $next_attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay.as_millis() as u64,
            "Retrying upload after backoff"
        );
    };
}

/// Log the completion of an upload run
///
/// # Example
///
/// ```no_run
/// use conversion_relay::log_upload_complete;
/// use conversion_relay::core::upload::UploadSummary;
///
/// let summary = UploadSummary::new("run-1");
/// log_upload_complete!(&summary);
/// ```
#[macro_export]
macro_rules! log_upload_complete {
    ($summary:expr) => {
        tracing::info!(
            run_id = %$summary.run_id,
            total = $summary.total_records,
            successful = $summary.successful_uploads,
            failed = $summary.failed_uploads,
            attempts = $summary.total_attempts,
            success_rate = $summary.success_rate(),
            duration_ms = $summary.duration.as_millis() as u64,
            dry_run = $summary.dry_run,
            "Upload completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use conversion_relay::log_error_with_context;
/// use conversion_relay::domain::RelayError;
///
/// let error = RelayError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
