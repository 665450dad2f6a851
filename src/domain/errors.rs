//! Domain error types
//!
//! This module defines the error hierarchy for the relay.
//! Errors are domain-specific and don't expose third-party types.

use std::time::Duration;
use thiserror::Error;

/// Main relay error type
///
/// This is the primary error type used throughout the application.
/// Only conditions that abort a whole run are represented here; per-record
/// problems are folded into the record's outcome instead.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Expected input artifact does not exist
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    /// Input exists but cannot be read as the expected table
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A value that violates a domain invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl RelayError {
    /// Whether this error means the run's input could not be used
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RelayError::InputNotFound(_) | RelayError::InvalidInput(_)
        )
    }
}

/// Failure of a single delivery attempt
///
/// Returned by a [`ConversionDelivery`](crate::adapters::delivery::ConversionDelivery)
/// implementation. The uploader treats every variant as retryable until the
/// attempt bound is reached.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The remote side refused the conversion
    #[error("Conversion rejected: {0}")]
    Rejected(String),

    /// Could not reach the remote side
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The attempt did not finish within the per-attempt timeout
    #[error("Attempt timed out after {0:?}")]
    Timeout(Duration),
}

// Conversion from std::io::Error
impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::Io(err.to_string())
    }
}

// Conversion from csv::Error
impl From<csv::Error> for RelayError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => RelayError::Io(err.to_string()),
            _ => RelayError::InvalidInput(err.to_string()),
        }
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RelayError {
    fn from(err: toml::de::Error) -> Self {
        RelayError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_error_display() {
        let err = RelayError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_input_not_found_display() {
        let err = RelayError::InputNotFound("data/conversions.csv".to_string());
        assert_eq!(
            err.to_string(),
            "Input file not found: data/conversions.csv"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_delivery_timeout_display() {
        let err = DeliveryError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "Attempt timed out after 5s");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let relay_err: RelayError = io_err.into();
        assert!(matches!(relay_err, RelayError::Io(_)));
    }

    #[test]
    fn test_csv_error_conversion() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("a,b\nc\n".as_bytes());
        let csv_err = reader
            .records()
            .find_map(|r| r.err())
            .expect("ragged row should fail");
        let relay_err: RelayError = csv_err.into();
        assert!(matches!(relay_err, RelayError::InvalidInput(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let relay_err: RelayError = json_err.into();
        assert!(matches!(relay_err, RelayError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let relay_err: RelayError = toml_err.into();
        assert!(matches!(relay_err, RelayError::Configuration(_)));
        assert!(relay_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_relay_error_implements_std_error() {
        let err = RelayError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
