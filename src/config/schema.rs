//! Configuration schema types
//!
//! Every section has defaults, so an empty file (or no file at all) yields a
//! working configuration that mirrors the conventional `data/` and `output/`
//! layout.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main relay configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Normalizer settings
    #[serde(default)]
    pub normalize: NormalizeConfig,

    /// Uploader settings
    #[serde(default)]
    pub upload: UploadConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.normalize.validate()?;
        self.upload.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Normalizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Raw conversion export to read
    #[serde(default = "default_raw_input_path")]
    pub input_path: String,

    /// Where the clean record set is written
    #[serde(default = "default_clean_path")]
    pub output_path: String,

    /// Source column names
    #[serde(default)]
    pub columns: ColumnConfig,
}

impl NormalizeConfig {
    fn validate(&self) -> Result<(), String> {
        if self.input_path.trim().is_empty() {
            return Err("normalize.input_path cannot be empty".to_string());
        }
        if self.output_path.trim().is_empty() {
            return Err("normalize.output_path cannot be empty".to_string());
        }
        if self.input_path == self.output_path {
            return Err("normalize.output_path must differ from normalize.input_path".to_string());
        }
        self.columns.validate()
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            input_path: default_raw_input_path(),
            output_path: default_clean_path(),
            columns: ColumnConfig::default(),
        }
    }
}

/// Column names in the raw export
///
/// The click identifier column is renamed to `gclid` in the clean output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Click identifier column
    #[serde(default = "default_click_id_column")]
    pub click_id: String,

    /// Raw timestamp column
    #[serde(default = "default_timestamp_column")]
    pub timestamp: String,

    /// Numeric conversion value column
    #[serde(default = "default_value_column")]
    pub conversion_value: String,

    /// Campaign tag column
    #[serde(default = "default_campaign_column")]
    pub campaign: String,
}

impl ColumnConfig {
    fn validate(&self) -> Result<(), String> {
        let columns = [
            ("click_id", &self.click_id),
            ("timestamp", &self.timestamp),
            ("conversion_value", &self.conversion_value),
            ("campaign", &self.campaign),
        ];
        for (key, name) in columns {
            if name.trim().is_empty() {
                return Err(format!("normalize.columns.{key} cannot be empty"));
            }
        }
        Ok(())
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            click_id: default_click_id_column(),
            timestamp: default_timestamp_column(),
            conversion_value: default_value_column(),
            campaign: default_campaign_column(),
        }
    }
}

/// Uploader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Clean record set to upload
    #[serde(default = "default_clean_path")]
    pub input_path: String,

    /// Where the per-record audit log is written
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Conversion action the uploads are attributed to
    #[serde(default = "default_conversion_action")]
    pub conversion_action: String,

    /// Maximum delivery attempts per record (including the first)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Optional upper bound on any single backoff delay, in milliseconds
    ///
    /// Unset means pure doubling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff_ms: Option<u64>,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,

    /// Records uploaded at once (1 = strictly sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Dry run mode - validate input and report without delivering
    #[serde(default)]
    pub dry_run: bool,

    /// Simulated endpoint behaviour
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl UploadConfig {
    fn validate(&self) -> Result<(), String> {
        if self.input_path.trim().is_empty() {
            return Err("upload.input_path cannot be empty".to_string());
        }
        if self.log_path.trim().is_empty() {
            return Err("upload.log_path cannot be empty".to_string());
        }
        if self.conversion_action.trim().is_empty() {
            return Err("upload.conversion_action cannot be empty".to_string());
        }
        if self.max_attempts == 0 || self.max_attempts > 20 {
            return Err(format!(
                "upload.max_attempts must be between 1 and 20, got {}",
                self.max_attempts
            ));
        }
        if let Some(max_backoff_ms) = self.max_backoff_ms {
            if max_backoff_ms < self.initial_backoff_ms {
                return Err(format!(
                    "upload.max_backoff_ms ({}) must be at least upload.initial_backoff_ms ({})",
                    max_backoff_ms, self.initial_backoff_ms
                ));
            }
        }
        if self.attempt_timeout_secs == 0 {
            return Err("upload.attempt_timeout_secs must be greater than 0".to_string());
        }
        if self.concurrency == 0 || self.concurrency > 64 {
            return Err(format!(
                "upload.concurrency must be between 1 and 64, got {}",
                self.concurrency
            ));
        }
        self.simulation.validate()
    }

    /// Delay before the second attempt
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Upper bound on any single backoff delay, if one is configured
    pub fn max_backoff(&self) -> Option<Duration> {
        self.max_backoff_ms.map(Duration::from_millis)
    }

    /// Per-attempt timeout
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            input_path: default_clean_path(),
            log_path: default_log_path(),
            conversion_action: default_conversion_action(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: None,
            attempt_timeout_secs: default_attempt_timeout_secs(),
            concurrency: default_concurrency(),
            dry_run: false,
            simulation: SimulationConfig::default(),
        }
    }
}

/// Simulated ads endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Probability that a single attempt succeeds
    #[serde(default = "default_success_probability")]
    pub success_probability: f64,

    /// Action ID returned for accepted conversions
    #[serde(default = "default_action_id")]
    pub action_id: String,

    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.success_probability) {
            return Err(format!(
                "upload.simulation.success_probability must be between 0.0 and 1.0, got {}",
                self.success_probability
            ));
        }
        if self.action_id.trim().is_empty() {
            return Err("upload.simulation.action_id cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            success_probability: default_success_probability(),
            action_id: default_action_id(),
            seed: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_raw_input_path() -> String {
    "data/conversions.csv".to_string()
}

fn default_clean_path() -> String {
    "output/cleaned_conversions.csv".to_string()
}

fn default_log_path() -> String {
    "output/upload_log.csv".to_string()
}

fn default_click_id_column() -> String {
    "google_click_id (gclid)".to_string()
}

fn default_timestamp_column() -> String {
    "timestamp".to_string()
}

fn default_value_column() -> String {
    "conversion_value".to_string()
}

fn default_campaign_column() -> String {
    "utm_campaign".to_string()
}

fn default_conversion_action() -> String {
    "offline_purchase".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_attempt_timeout_secs() -> u64 {
    30
}

fn default_concurrency() -> usize {
    1
}

fn default_success_probability() -> f64 {
    0.9
}

fn default_action_id() -> String {
    "1234567890".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RelayConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.normalize.input_path, "data/conversions.csv");
        assert_eq!(config.normalize.columns.click_id, "google_click_id (gclid)");
        assert_eq!(config.upload.input_path, config.normalize.output_path);
        assert_eq!(config.upload.log_path, "output/upload_log.csv");
        assert_eq!(config.upload.conversion_action, "offline_purchase");
        assert_eq!(config.upload.max_attempts, 3);
        assert_eq!(config.upload.initial_backoff(), Duration::from_secs(1));
        assert_eq!(config.upload.concurrency, 1);
        assert_eq!(config.upload.simulation.success_probability, 0.9);
        assert_eq!(config.upload.simulation.action_id, "1234567890");
        assert!(config.upload.simulation.seed.is_none());
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = RelayConfig::default();
        config.application.log_level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log_level"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = RelayConfig::default();
        config.upload.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backoff_cap_below_initial_rejected() {
        let mut config = RelayConfig::default();
        config.upload.initial_backoff_ms = 5000;
        config.upload.max_backoff_ms = Some(1000);
        let err = config.validate().unwrap_err();
        assert!(err.contains("max_backoff_ms"));
    }

    #[test]
    fn test_backoff_uncapped_by_default() {
        let config = RelayConfig::default();
        assert_eq!(config.upload.max_backoff_ms, None);
        assert_eq!(config.upload.max_backoff(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut config = RelayConfig::default();
        config.upload.simulation.success_probability = 1.5;
        assert!(config.validate().is_err());

        config.upload.simulation.success_probability = -0.1;
        assert!(config.validate().is_err());

        config.upload.simulation.success_probability = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = RelayConfig::default();
        config.upload.concurrency = 0;
        assert!(config.validate().is_err());

        config.upload.concurrency = 65;
        assert!(config.validate().is_err());

        config.upload.concurrency = 8;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_column_name_rejected() {
        let mut config = RelayConfig::default();
        config.normalize.columns.timestamp = " ".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err, "normalize.columns.timestamp cannot be empty");
    }

    #[test]
    fn test_normalize_output_must_differ_from_input() {
        let mut config = RelayConfig::default();
        config.normalize.output_path = config.normalize.input_path.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation_rejected() {
        let mut config = RelayConfig::default();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
