// Conversion Relay - Offline Conversion Normalizer and Uploader
// Copyright (c) 2025 Conversion Relay Contributors
// Licensed under the MIT License

use clap::Parser;
use conversion_relay::cli::commands::{report_load_failure, EXIT_FATAL};
use conversion_relay::cli::{Cli, Commands};
use conversion_relay::config::{resolve_config, LoggingConfig, RelayConfig, DEFAULT_CONFIG_PATH};
use conversion_relay::domain::Result;
use conversion_relay::logging::init_logging;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Resolved once; commands that need it report load errors themselves
    let loaded = resolve_config(cli.config.as_deref());

    let (log_level, logging_config) = match &loaded {
        Ok(config) => (
            cli.log_level
                .clone()
                .unwrap_or_else(|| config.application.log_level.clone()),
            config.logging.clone(),
        ),
        Err(_) => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            LoggingConfig::default(),
        ),
    };

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Conversion Relay - Offline Conversion Normalizer and Uploader"
    );

    let exit_code = tokio::select! {
        result = execute_command(&cli, loaded) => match result {
            Ok(code) => code,
            Err(e) => {
                tracing::error!(error = %e, "Command execution failed");
                eprintln!("Error: {e}");
                EXIT_FATAL
            }
        },
        _ = tokio::signal::ctrl_c() => {
            // outputs are only renamed into place once complete
            tracing::warn!("Received SIGINT (Ctrl+C), aborting run");
            eprintln!("\n⚠️  Interrupted, no output was written for the current stage");
            130
        }
    };

    // process::exit skips destructors
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, loaded: Result<RelayConfig>) -> anyhow::Result<i32> {
    let source = config_source(cli.config.as_deref());
    let require = |loaded: Result<RelayConfig>| {
        loaded.map_err(|e| report_load_failure(&source, &e))
    };

    match &cli.command {
        Commands::Init(args) => args.execute().await,
        Commands::ValidateConfig(args) => args.execute(&source, &loaded).await,
        Commands::Normalize(args) => match require(loaded) {
            Ok(config) => args.execute(config).await,
            Err(code) => Ok(code),
        },
        Commands::Upload(args) => match require(loaded) {
            Ok(config) => args.execute(config).await,
            Err(code) => Ok(code),
        },
        Commands::Run(args) => match require(loaded) {
            Ok(config) => args.execute(config).await,
            Err(code) => Ok(code),
        },
    }
}

fn config_source(explicit: Option<&str>) -> String {
    match explicit {
        Some(path) => path.to_string(),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH.to_string(),
        None => "built-in defaults".to_string(),
    }
}
