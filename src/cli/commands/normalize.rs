//! Normalize command implementation
//!
//! Reads the raw export, drops unusable rows and writes the clean CSV.

use super::{print_json, print_normalize_summary, report_failure, validate_overrides, EXIT_SUCCESS};
use crate::config::RelayConfig;
use crate::core::pipeline::PipelineCoordinator;
use clap::Args;

/// Arguments for the normalize command
#[derive(Args, Debug, Default)]
pub struct NormalizeArgs {
    /// Override the raw export path
    #[arg(short, long)]
    pub input: Option<String>,

    /// Override the clean CSV path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the source column holding the click identifier
    #[arg(long)]
    pub click_id_column: Option<String>,

    /// Parse and report without writing the clean CSV
    #[arg(long)]
    pub dry_run: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl NormalizeArgs {
    /// Applies command-line overrides to the loaded configuration
    pub fn apply(&self, config: &mut RelayConfig) {
        if let Some(input) = &self.input {
            tracing::info!(input = %input, "Overriding raw input path from CLI");
            config.normalize.input_path = input.clone();
        }
        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding clean output path from CLI");
            config.normalize.output_path = output.clone();
        }
        if let Some(column) = &self.click_id_column {
            tracing::info!(column = %column, "Overriding click identifier column from CLI");
            config.normalize.columns.click_id = column.clone();
        }
    }

    /// Execute the normalize command
    pub async fn execute(&self, mut config: RelayConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting normalize command");

        self.apply(&mut config);
        if let Some(code) = validate_overrides(&config) {
            return Ok(code);
        }

        let coordinator = match PipelineCoordinator::new(config) {
            Ok(c) => c,
            Err(e) => return Ok(report_failure("Normalize", &e)),
        };

        if !self.json {
            println!(
                "🧹 Normalizing {}",
                coordinator.config().normalize.input_path
            );
        }

        let result = if self.dry_run {
            coordinator.normalize_dry_run()
        } else {
            coordinator.normalize()
        };

        let summary = match result {
            Ok(s) => s,
            Err(e) => return Ok(report_failure("Normalize", &e)),
        };

        if self.json {
            print_json(&summary)?;
        } else {
            print_normalize_summary(&summary, self.dry_run);
        }

        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let args = NormalizeArgs {
            input: Some("in.csv".to_string()),
            output: Some("out.csv".to_string()),
            click_id_column: Some("gclid".to_string()),
            ..NormalizeArgs::default()
        };
        let mut config = RelayConfig::default();

        args.apply(&mut config);

        assert_eq!(config.normalize.input_path, "in.csv");
        assert_eq!(config.normalize.output_path, "out.csv");
        assert_eq!(config.normalize.columns.click_id, "gclid");
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = RelayConfig::default();
        NormalizeArgs::default().apply(&mut config);
        assert_eq!(config.normalize.input_path, "data/conversions.csv");
    }

    #[tokio::test]
    async fn test_missing_input_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let args = NormalizeArgs {
            input: Some(dir.path().join("absent.csv").to_string_lossy().to_string()),
            output: Some(dir.path().join("clean.csv").to_string_lossy().to_string()),
            json: true,
            ..NormalizeArgs::default()
        };

        let code = args.execute(RelayConfig::default()).await.unwrap();

        assert_eq!(code, super::super::EXIT_INPUT_ERROR);
        assert!(!dir.path().join("clean.csv").exists());
    }
}
