//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RelayConfig;
use crate::domain::errors::RelayError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Configuration file picked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "relay.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RelayConfig
/// 4. Applies environment variable overrides (RELAY_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use conversion_relay::config::loader::load_config;
///
/// let config = load_config("relay.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RelayConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RelayError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RelayError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: RelayConfig = toml::from_str(&contents)
        .map_err(|e| RelayError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(config)
}

/// Resolves the effective configuration for a CLI invocation
///
/// An explicit path must exist. Without one, `relay.toml` in the working
/// directory is used when present and built-in defaults otherwise; in both
/// cases `RELAY_*` overrides still apply.
pub fn resolve_config(explicit_path: Option<&str>) -> Result<RelayConfig> {
    match explicit_path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => {
            tracing::debug!(
                path = DEFAULT_CONFIG_PATH,
                "No configuration file found, using built-in defaults"
            );
            finish(RelayConfig::default())
        }
    }
}

fn finish(mut config: RelayConfig) -> Result<RelayConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        RelayError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RelayError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Comment lines are copied through untouched
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RelayError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        RelayError::Configuration(format!("Invalid value '{value}' for environment variable {name}"))
    })
}

/// Applies environment variable overrides using RELAY_* prefix
///
/// Environment variables follow the pattern: RELAY_<SECTION>_<KEY>
/// For example: RELAY_UPLOAD_MAX_ATTEMPTS, RELAY_NORMALIZE_INPUT_PATH
fn apply_env_overrides(config: &mut RelayConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("RELAY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Normalizer overrides
    if let Ok(val) = std::env::var("RELAY_NORMALIZE_INPUT_PATH") {
        config.normalize.input_path = val;
    }
    if let Ok(val) = std::env::var("RELAY_NORMALIZE_OUTPUT_PATH") {
        config.normalize.output_path = val;
    }
    if let Ok(val) = std::env::var("RELAY_NORMALIZE_COLUMNS_CLICK_ID") {
        config.normalize.columns.click_id = val;
    }

    // Uploader overrides
    if let Ok(val) = std::env::var("RELAY_UPLOAD_INPUT_PATH") {
        config.upload.input_path = val;
    }
    if let Ok(val) = std::env::var("RELAY_UPLOAD_LOG_PATH") {
        config.upload.log_path = val;
    }
    if let Ok(val) = std::env::var("RELAY_UPLOAD_CONVERSION_ACTION") {
        config.upload.conversion_action = val;
    }
    if let Ok(val) = std::env::var("RELAY_UPLOAD_MAX_ATTEMPTS") {
        config.upload.max_attempts = parse_override("RELAY_UPLOAD_MAX_ATTEMPTS", &val)?;
    }
    if let Ok(val) = std::env::var("RELAY_UPLOAD_INITIAL_BACKOFF_MS") {
        config.upload.initial_backoff_ms = parse_override("RELAY_UPLOAD_INITIAL_BACKOFF_MS", &val)?;
    }
    if let Ok(val) = std::env::var("RELAY_UPLOAD_MAX_BACKOFF_MS") {
        config.upload.max_backoff_ms = Some(parse_override("RELAY_UPLOAD_MAX_BACKOFF_MS", &val)?);
    }
    if let Ok(val) = std::env::var("RELAY_UPLOAD_CONCURRENCY") {
        config.upload.concurrency = parse_override("RELAY_UPLOAD_CONCURRENCY", &val)?;
    }
    if let Ok(val) = std::env::var("RELAY_UPLOAD_DRY_RUN") {
        config.upload.dry_run = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("RELAY_UPLOAD_SIMULATION_SUCCESS_PROBABILITY") {
        config.upload.simulation.success_probability =
            parse_override("RELAY_UPLOAD_SIMULATION_SUCCESS_PROBABILITY", &val)?;
    }
    if let Ok(val) = std::env::var("RELAY_UPLOAD_SIMULATION_SEED") {
        config.upload.simulation.seed = Some(parse_override("RELAY_UPLOAD_SIMULATION_SEED", &val)?);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("RELAY_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("RELAY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
