//! Upload outcome model
//!
//! One [`UploadOutcome`] is produced per clean record and written to the
//! audit log.

use super::conversion::{CleanConversionRecord, ConversionTime};
use super::ids::{ActionId, ClickId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error description recorded when every attempt for a record failed
pub const PERSISTENT_FAILURE_MESSAGE: &str = "Simulated persistent failure after retries";

/// Terminal status of a record's upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    /// One attempt within the bound was accepted
    Success,
    /// All attempts were used up without success
    Failure,
}

impl UploadStatus {
    /// Returns the status label used in the audit log
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Success => "SUCCESS",
            UploadStatus::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of uploading a single clean record
///
/// Successful outcomes carry the assigned action ID and echo the record's
/// timestamp and value. Failed outcomes carry an error description instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// Terminal status
    pub status: UploadStatus,

    /// Conversion action ID assigned on success
    pub action_id: Option<ActionId>,

    /// Click identifier of the uploaded record
    pub click_id: ClickId,

    /// Echoed normalized timestamp (success only)
    pub conversion_time: Option<ConversionTime>,

    /// Echoed conversion value (success only)
    pub conversion_value: Option<f64>,

    /// Error description (failure only)
    pub error_message: Option<String>,

    /// Number of attempts made, between 1 and the configured maximum
    pub attempts: u32,
}

impl UploadOutcome {
    /// Creates a successful outcome for `record`
    pub fn success(record: &CleanConversionRecord, action_id: ActionId, attempts: u32) -> Self {
        Self {
            status: UploadStatus::Success,
            action_id: Some(action_id),
            click_id: record.click_id().clone(),
            conversion_time: record.conversion_time(),
            conversion_value: Some(record.conversion_value()),
            error_message: None,
            attempts,
        }
    }

    /// Creates a failed outcome for `record` after `attempts` tries
    pub fn failure(record: &CleanConversionRecord, attempts: u32) -> Self {
        Self {
            status: UploadStatus::Failure,
            action_id: None,
            click_id: record.click_id().clone(),
            conversion_time: None,
            conversion_value: None,
            error_message: Some(PERSISTENT_FAILURE_MESSAGE.to_string()),
            attempts,
        }
    }

    /// Whether the record was delivered
    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Success
    }
}
