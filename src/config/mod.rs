//! Configuration management for the relay.
//!
//! # Overview
//!
//! The relay uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `RELAY_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use conversion_relay::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("relay.toml")?;
//!
//! println!("Raw input: {}", config.normalize.input_path);
//! println!("Max attempts: {}", config.upload.max_attempts);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [normalize]
//! input_path = "data/conversions.csv"
//! output_path = "output/cleaned_conversions.csv"
//!
//! [normalize.columns]
//! click_id = "google_click_id (gclid)"
//!
//! [upload]
//! log_path = "output/upload_log.csv"
//! conversion_action = "offline_purchase"
//! max_attempts = 3
//! initial_backoff_ms = 1000
//!
//! [upload.simulation]
//! success_probability = 0.9
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, resolve_config, DEFAULT_CONFIG_PATH};
pub use schema::{
    ApplicationConfig, ColumnConfig, LoggingConfig, NormalizeConfig, RelayConfig,
    SimulationConfig, UploadConfig,
};
