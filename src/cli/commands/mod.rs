//! CLI command implementations
//!
//! Every command returns a process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success, including upload runs where some records failed |
//! | 2 | Configuration error |
//! | 3 | Missing or unreadable input |
//! | 5 | Any other fatal error |

pub mod init;
pub mod normalize;
pub mod run;
pub mod upload;
pub mod validate;

use crate::config::RelayConfig;
use crate::core::pipeline::NormalizeSummary;
use crate::core::upload::UploadSummary;
use crate::domain::RelayError;

/// Success
pub const EXIT_SUCCESS: i32 = 0;
/// Invalid or unreadable configuration
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Input file missing or malformed
pub const EXIT_INPUT_ERROR: i32 = 3;
/// Any other fatal error
pub const EXIT_FATAL: i32 = 5;

/// Maps a fatal error to its exit code
pub fn exit_code_for(error: &RelayError) -> i32 {
    match error {
        RelayError::Configuration(_) => EXIT_CONFIG_ERROR,
        e if e.is_input_error() => EXIT_INPUT_ERROR,
        _ => EXIT_FATAL,
    }
}

/// Re-validates configuration after command-line overrides
fn validate_overrides(config: &RelayConfig) -> Option<i32> {
    match config.validate() {
        Ok(()) => None,
        Err(e) => {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            Some(EXIT_CONFIG_ERROR)
        }
    }
}

/// Reports a configuration that could not be loaded and returns its exit code
pub fn report_load_failure(source: &str, error: &RelayError) -> i32 {
    tracing::error!(source = %source, error = %error, "Failed to load configuration");
    eprintln!("Failed to load configuration from {source}: {error}");
    exit_code_for(error)
}

/// Reports a fatal stage error and returns its exit code
fn report_failure(stage: &str, error: &RelayError) -> i32 {
    crate::log_error_with_context!(error, stage);
    eprintln!("{stage} failed: {error}");
    exit_code_for(error)
}

fn print_normalize_summary(summary: &NormalizeSummary, dry_run: bool) {
    let report = &summary.report;

    println!();
    println!("📊 Normalization Summary:");
    println!("  Records read: {}", report.total_records);
    println!("  Valid conversions: {}", report.valid_records);
    println!("  Dropped: {}", report.dropped());
    println!("    Missing gclid: {}", report.dropped_missing_click_id);
    println!("    Invalid value: {}", report.dropped_invalid_value);
    if report.unparseable_timestamps > 0 {
        println!(
            "  ⚠️  Unparseable timestamps: {} (kept with empty conversion_time)",
            report.unparseable_timestamps
        );
    }
    if dry_run {
        println!("  Output: not written (dry run)");
    } else {
        println!("  Output: {}", summary.output_path);
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();
}

fn print_upload_summary(summary: &UploadSummary) {
    println!();
    println!("📊 Upload Summary:");
    if summary.dry_run {
        println!("  🔍 DRY RUN - no conversions were sent");
        println!("  Records checked: {}", summary.total_records);
    } else {
        println!("  Total: {}", summary.total_records);
        println!("  Successful: {}", summary.successful_uploads);
        println!("  Failed: {}", summary.failed_uploads);
        println!("  Retried: {}", summary.retried_records);
        println!("  Success Rate: {:.2}%", summary.success_rate());
    }
    if let Some(log_path) = &summary.log_path {
        println!("  Audit log: {log_path}");
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if summary.failed_uploads > 0 {
        println!(
            "⚠️  {} conversion(s) failed after all retries; see the audit log",
            summary.failed_uploads
        );
    } else if !summary.dry_run {
        println!("✅ All conversions uploaded");
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&RelayError::Configuration("bad".into())),
            EXIT_CONFIG_ERROR
        );
        assert_eq!(
            exit_code_for(&RelayError::InputNotFound("a.csv".into())),
            EXIT_INPUT_ERROR
        );
        assert_eq!(
            exit_code_for(&RelayError::InvalidInput("header".into())),
            EXIT_INPUT_ERROR
        );
        assert_eq!(exit_code_for(&RelayError::Io("disk".into())), EXIT_FATAL);
    }
}
