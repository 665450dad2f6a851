//! Run command implementation
//!
//! Normalizes the raw export and uploads the result in one process.

use super::normalize::NormalizeArgs;
use super::{
    print_json, print_normalize_summary, print_upload_summary, report_failure,
    validate_overrides, EXIT_SUCCESS,
};
use crate::config::RelayConfig;
use crate::core::pipeline::PipelineCoordinator;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Override the raw export path
    #[arg(short, long)]
    pub input: Option<String>,

    /// Override the clean CSV path
    #[arg(short, long)]
    pub output: Option<String>,

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

    /// Write the clean CSV but send nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Print both summaries as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Applies command-line overrides to the loaded configuration
    pub fn apply(&self, config: &mut RelayConfig) {
        NormalizeArgs {
            input: self.input.clone(),
            output: self.output.clone(),
            ..NormalizeArgs::default()
        }
        .apply(config);

        super::upload::UploadArgs {
            log: self.log.clone(),
            max_attempts: self.max_attempts,
            seed: self.seed,
            concurrency: self.concurrency,
            dry_run: self.dry_run,
            ..super::upload::UploadArgs::default()
        }
        .apply(config);
    }

    /// Execute the run command
    pub async fn execute(&self, mut config: RelayConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        self.apply(&mut config);
        if let Some(code) = validate_overrides(&config) {
            return Ok(code);
        }

        let coordinator = match PipelineCoordinator::new(config) {
            Ok(c) => c,
            Err(e) => return Ok(report_failure("Run", &e)),
        };

        if !self.json {
            println!(
                "🚀 Normalizing {} and uploading the result",
                coordinator.config().normalize.input_path
            );
        }

        let summary = match coordinator.run().await {
            Ok(s) => s,
            Err(e) => return Ok(report_failure("Run", &e)),
        };

        if self.json {
            print_json(&summary)?;
        } else {
            print_normalize_summary(&summary.normalize, false);
            print_upload_summary(&summary.upload);
        }

        Ok(EXIT_SUCCESS)
    }
}
