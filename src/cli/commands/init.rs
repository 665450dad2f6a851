//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use crate::config::DEFAULT_CONFIG_PATH;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing relay configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your paths and column names", self.output);
                println!("  2. Validate configuration: conversion-relay validate-config");
                println!("  3. Clean the export: conversion-relay normalize");
                println!("  4. Upload: conversion-relay upload");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Sample configuration with every option and its default
    fn generate_config() -> String {
        r#"# Conversion Relay Configuration File
#
# Every value below is the built-in default. ${VAR} placeholders are
# substituted from the environment, and RELAY_<SECTION>_<KEY> variables
# override values from this file.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Normalization
# ============================================================================
[normalize]
# Raw conversion export
input_path = "data/conversions.csv"

# Clean CSV consumed by the upload stage
output_path = "output/cleaned_conversions.csv"

# Source column names in the raw export
[normalize.columns]
# A column named "gclid" is also accepted when this one is absent
click_id = "google_click_id (gclid)"
timestamp = "timestamp"
conversion_value = "conversion_value"
campaign = "utm_campaign"

# ============================================================================
# Upload
# ============================================================================
[upload]
# Clean CSV to upload
input_path = "output/cleaned_conversions.csv"

# Audit log with one row per uploaded record
log_path = "output/upload_log.csv"

# Conversion action the records are attributed to
conversion_action = "offline_purchase"

# Attempts per record (1-20)
max_attempts = 3

# Delay before the second attempt; doubles after every failure
initial_backoff_ms = 1000

# Optional upper bound on a single delay; unset means pure doubling
# max_backoff_ms = 30000

# Bound on a single delivery call
attempt_timeout_secs = 30

# Records uploaded at once (1 = strictly sequential)
concurrency = 1

# Check the input without sending anything
dry_run = false

# Simulated ads API endpoint
[upload.simulation]
# Probability that a single attempt is accepted (0.0-1.0)
success_probability = 0.9

# Action ID returned for accepted conversions
action_id = "1234567890"

# Fix the random sequence for reproducible runs
# seed = 42

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Write JSON logs to a local file
local_enabled = false

# Local log directory
local_path = "logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
