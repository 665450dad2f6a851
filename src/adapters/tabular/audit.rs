//! Upload audit log
//!
//! One row per clean record, successes and failures in a single schema.
//! Cells that do not apply to a row's status are left empty.

use super::write_atomically;
use crate::domain::outcome::UploadOutcome;
use crate::domain::{RelayError, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;

/// Header of the audit log, in column order
pub const AUDIT_COLUMNS: [&str; 7] = [
    "status",
    "conversion_action_id",
    "gclid",
    "conversion_time",
    "conversion_value",
    "error_message",
    "attempts",
];

#[derive(Debug, Serialize)]
struct AuditRow<'a> {
    status: &'static str,
    conversion_action_id: &'a str,
    gclid: &'a str,
    conversion_time: String,
    conversion_value: String,
    error_message: &'a str,
    attempts: u32,
}

impl<'a> From<&'a UploadOutcome> for AuditRow<'a> {
    fn from(outcome: &'a UploadOutcome) -> Self {
        Self {
            status: outcome.status.as_str(),
            conversion_action_id: outcome.action_id.as_ref().map_or("", |id| id.as_str()),
            gclid: outcome.click_id.as_str(),
            conversion_time: outcome
                .conversion_time
                .map(|t| t.to_string())
                .unwrap_or_default(),
            conversion_value: outcome
                .conversion_value
                .map(|v| v.to_string())
                .unwrap_or_default(),
            error_message: outcome.error_message.as_deref().unwrap_or(""),
            attempts: outcome.attempts,
        }
    }
}

/// Writes the audit log for one upload run, replacing any previous log
pub fn write_outcomes(path: &Path, outcomes: &[UploadOutcome]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(AUDIT_COLUMNS)?;
    for outcome in outcomes {
        writer.serialize(AuditRow::from(outcome))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RelayError::Io(format!("failed to flush audit log: {e}")))?;

    write_atomically(path, &bytes)?;

    tracing::debug!(path = %path.display(), rows = outcomes.len(), "Wrote upload audit log");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversion::CleanConversionRecord;
    use crate::domain::ids::{ActionId, ClickId};
    use tempfile::TempDir;

    fn record(id: &str) -> CleanConversionRecord {
        CleanConversionRecord::new(
            ClickId::new(id).unwrap(),
            Some("2024-01-15 10:30:00+00:00".parse().unwrap()),
            150.0,
            "spring_sale",
        )
        .unwrap()
    }

    #[test]
    fn test_mixed_outcomes_share_one_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("upload_log.csv");
        let outcomes = vec![
            UploadOutcome::success(&record("ABC123"), ActionId::new("1234567890").unwrap(), 2),
            UploadOutcome::failure(&record("DEF456"), 3),
        ];

        write_outcomes(&path, &outcomes).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "status,conversion_action_id,gclid,conversion_time,conversion_value,error_message,attempts\n\
             SUCCESS,1234567890,ABC123,2024-01-15 10:30:00+00:00,150,,2\n\
             FAILURE,,DEF456,,,Simulated persistent failure after retries,3\n"
        );
    }

    #[test]
    fn test_empty_run_writes_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("upload_log.csv");

        write_outcomes(&path, &[]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim_end(), AUDIT_COLUMNS.join(","));
    }
}
