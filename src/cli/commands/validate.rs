//! Validate config command implementation
//!
//! This module implements the `validate-config` command, which loads the
//! effective configuration (file, `${VAR}` substitution and `RELAY_*`
//! overrides) and prints it.

use super::{exit_code_for, EXIT_SUCCESS};
use crate::config::RelayConfig;
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, source: &str, loaded: &Result<RelayConfig>) -> anyhow::Result<i32> {
        tracing::info!(source = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        let config = match loaded {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(exit_code_for(e));
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Raw Input: {}", config.normalize.input_path);
        println!("  Clean Output: {}", config.normalize.output_path);
        println!("  Click ID Column: {}", config.normalize.columns.click_id);
        println!("  Upload Input: {}", config.upload.input_path);
        println!("  Audit Log: {}", config.upload.log_path);
        println!("  Conversion Action: {}", config.upload.conversion_action);
        println!("  Max Attempts: {}", config.upload.max_attempts);
        match config.upload.max_backoff_ms {
            Some(cap) => println!(
                "  Backoff: {}ms initial, {cap}ms cap",
                config.upload.initial_backoff_ms
            ),
            None => println!(
                "  Backoff: {}ms initial, doubling without cap",
                config.upload.initial_backoff_ms
            ),
        }
        println!("  Attempt Timeout: {}s", config.upload.attempt_timeout_secs);
        println!("  Concurrency: {}", config.upload.concurrency);
        println!(
            "  Success Probability: {}",
            config.upload.simulation.success_probability
        );
        if let Some(seed) = config.upload.simulation.seed {
            println!("  Seed: {seed}");
        }
        println!("  Dry Run: {}", config.upload.dry_run);
        println!();
        Ok(EXIT_SUCCESS)
    }
}
