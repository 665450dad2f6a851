//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the relay using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Conversion Relay - offline conversion normalizer and uploader
#[derive(Parser, Debug)]
#[command(name = "conversion-relay")]
#[command(version, about, long_about = None)]
#[command(author = "Conversion Relay Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to relay.toml when present)
    #[arg(short, long, env = "RELAY_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RELAY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a raw conversion export into the upload-ready CSV
    Normalize(commands::normalize::NormalizeArgs),

    /// Upload the clean CSV with retries and write the audit log
    Upload(commands::upload::UploadArgs),

    /// Normalize, then upload the freshly cleaned file
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_normalize() {
        let cli = Cli::parse_from(["conversion-relay", "normalize"]);
        assert_eq!(cli.config, None);
        assert!(matches!(cli.command, Commands::Normalize(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["conversion-relay", "--config", "custom.toml", "upload"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert!(matches!(cli.command, Commands::Upload(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["conversion-relay", "-l", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_upload_overrides() {
        let cli = Cli::parse_from([
            "conversion-relay",
            "upload",
            "--max-attempts",
            "5",
            "--seed",
            "42",
            "--json",
        ]);

        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.max_attempts, Some(5));
                assert_eq!(args.seed, Some(42));
                assert!(args.json);
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["conversion-relay", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["conversion-relay", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
