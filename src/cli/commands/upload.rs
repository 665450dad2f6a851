//! Upload command implementation
//!
//! Uploads the clean CSV to the (simulated) ads API and writes the audit log.

use super::{print_json, print_upload_summary, report_failure, validate_overrides, EXIT_SUCCESS};
use crate::config::RelayConfig;
use crate::core::pipeline::PipelineCoordinator;
use crate::core::upload::ConversionActionRegistry;
use clap::Args;

/// Arguments for the upload command
#[derive(Args, Debug, Default)]
pub struct UploadArgs {
    /// Override the clean CSV path
    #[arg(short, long)]
    pub input: Option<String>,

    /// Override the audit log path
    #[arg(long)]
    pub log: Option<String>,

    /// Override the maximum attempts per record
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Seed the simulated endpoint for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override how many records are uploaded at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Validate the input without sending anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl UploadArgs {
    /// Applies command-line overrides to the loaded configuration
    pub fn apply(&self, config: &mut RelayConfig) {
        let upload = &mut config.upload;

        if let Some(input) = &self.input {
            tracing::info!(input = %input, "Overriding clean input path from CLI");
            upload.input_path = input.clone();
        }
        if let Some(log) = &self.log {
            tracing::info!(log = %log, "Overriding audit log path from CLI");
            upload.log_path = log.clone();
        }
        if let Some(max_attempts) = self.max_attempts {
            tracing::info!(max_attempts, "Overriding max attempts from CLI");
            upload.max_attempts = max_attempts;
        }
        if let Some(seed) = self.seed {
            tracing::info!(seed, "Seeding simulated endpoint from CLI");
            upload.simulation.seed = Some(seed);
        }
        if let Some(concurrency) = self.concurrency {
            tracing::info!(concurrency, "Overriding concurrency from CLI");
            upload.concurrency = concurrency;
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            upload.dry_run = true;
        }
    }

    /// Execute the upload command
    pub async fn execute(&self, mut config: RelayConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting upload command");

        self.apply(&mut config);
        if let Some(code) = validate_overrides(&config) {
            return Ok(code);
        }

        let coordinator = match PipelineCoordinator::new(config) {
            Ok(c) => c,
            Err(e) => return Ok(report_failure("Upload", &e)),
        };

        if !self.json {
            let upload = &coordinator.config().upload;
            if upload.dry_run {
                println!("🔍 DRY RUN MODE - No conversions will be sent");
            }
            println!(
                "🚀 Uploading {} as '{}' (max {} attempts)",
                upload.input_path, upload.conversion_action, upload.max_attempts
            );
        }

        let mut registry = ConversionActionRegistry::new();
        let summary = match coordinator.upload(&mut registry).await {
            Ok(s) => s,
            Err(e) => return Ok(report_failure("Upload", &e)),
        };

        if self.json {
            print_json(&summary)?;
        } else {
            print_upload_summary(&summary);
        }

        // failed records are recorded in the audit log, not in the exit code
        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let args = UploadArgs {
            input: Some("clean.csv".to_string()),
            log: Some("audit.csv".to_string()),
            max_attempts: Some(5),
            seed: Some(7),
            concurrency: Some(4),
            dry_run: true,
            json: false,
        };
        let mut config = RelayConfig::default();

        args.apply(&mut config);

        assert_eq!(config.upload.input_path, "clean.csv");
        assert_eq!(config.upload.log_path, "audit.csv");
        assert_eq!(config.upload.max_attempts, 5);
        assert_eq!(config.upload.simulation.seed, Some(7));
        assert_eq!(config.upload.concurrency, 4);
        assert!(config.upload.dry_run);
    }

    #[tokio::test]
    async fn test_invalid_override_is_config_error() {
        let args = UploadArgs {
            max_attempts: Some(0),
            ..UploadArgs::default()
        };

        let code = args.execute(RelayConfig::default()).await.unwrap();
        assert_eq!(code, super::super::EXIT_CONFIG_ERROR);
    }

    #[tokio::test]
    async fn test_missing_clean_file_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let args = UploadArgs {
            input: Some(dir.path().join("absent.csv").to_string_lossy().to_string()),
            log: Some(dir.path().join("log.csv").to_string_lossy().to_string()),
            json: true,
            ..UploadArgs::default()
        };

        let code = args.execute(RelayConfig::default()).await.unwrap();

        assert_eq!(code, super::super::EXIT_INPUT_ERROR);
        assert!(!dir.path().join("log.csv").exists());
    }
}
