//! Clean conversion file
//!
//! The hand-off artifact between the normalizer and the uploader. Columns are
//! fixed: `gclid,conversion_time,conversion_value,utm_campaign,value_bucket`.

use super::write_atomically;
use crate::domain::conversion::{CleanConversionRecord, ConversionTime};
use crate::domain::ids::ClickId;
use crate::domain::{RelayError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Header of the clean file, in column order
pub const CLEAN_COLUMNS: [&str; 5] = [
    "gclid",
    "conversion_time",
    "conversion_value",
    "utm_campaign",
    "value_bucket",
];

/// One row of the clean file as text
#[derive(Debug, Serialize, Deserialize)]
struct CleanRow {
    gclid: String,
    conversion_time: String,
    conversion_value: String,
    utm_campaign: String,
    value_bucket: String,
}

impl From<&CleanConversionRecord> for CleanRow {
    fn from(record: &CleanConversionRecord) -> Self {
        Self {
            gclid: record.click_id().to_string(),
            conversion_time: record
                .conversion_time()
                .map(|t| t.to_string())
                .unwrap_or_default(),
            // Display keeps integral values integral ("150", not "150.0")
            conversion_value: record.conversion_value().to_string(),
            utm_campaign: record.campaign().to_string(),
            value_bucket: record.value_category().to_string(),
        }
    }
}

impl CleanRow {
    fn into_record(self, line: u64) -> Result<CleanConversionRecord> {
        let invalid = |msg: String| RelayError::InvalidInput(format!("line {line}: {msg}"));

        let click_id = ClickId::new(self.gclid).map_err(invalid)?;

        let conversion_time = if self.conversion_time.trim().is_empty() {
            None
        } else {
            Some(
                self.conversion_time
                    .parse::<ConversionTime>()
                    .map_err(|e| invalid(e.to_string()))?,
            )
        };

        let conversion_value = self
            .conversion_value
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(format!("invalid conversion_value '{}': {e}", self.conversion_value)))?;

        let record =
            CleanConversionRecord::new(click_id, conversion_time, conversion_value, self.utm_campaign)
                .map_err(|e| invalid(e.to_string()))?;

        if record.value_category().as_str() != self.value_bucket.trim() {
            tracing::warn!(
                line,
                gclid = %record.click_id(),
                file_bucket = %self.value_bucket,
                derived_bucket = %record.value_category(),
                "value_bucket does not match conversion_value, using derived bucket"
            );
        }

        Ok(record)
    }
}

/// Writes clean records to `path`, replacing any previous file
///
/// The header is always written, even for zero records. Parent directories
/// are created as needed.
pub fn write_clean_records(path: &Path, records: &[CleanConversionRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(CLEAN_COLUMNS)?;
    for record in records {
        writer.serialize(CleanRow::from(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RelayError::Io(format!("failed to flush clean records: {e}")))?;

    write_atomically(path, &bytes)?;

    tracing::debug!(path = %path.display(), rows = records.len(), "Wrote clean conversions");
    Ok(())
}

/// Reads a clean file written by [`write_clean_records`]
///
/// # Errors
///
/// - [`RelayError::InputNotFound`] if the file does not exist
/// - [`RelayError::InvalidInput`] if the header differs or any row is not a
///   valid clean record
pub fn read_clean_records(path: &Path) -> Result<Vec<CleanConversionRecord>> {
    if !path.exists() {
        return Err(RelayError::InputNotFound(path.display().to_string()));
    }

    let mut reader = ReaderBuilder::new().from_path(path)?;

    let headers = reader.headers()?.clone();
    let actual: Vec<&str> = headers.iter().map(str::trim).collect();
    if actual != CLEAN_COLUMNS {
        return Err(RelayError::InvalidInput(format!(
            "unexpected clean file header: expected '{}', found '{}'",
            CLEAN_COLUMNS.join(","),
            actual.join(",")
        )));
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<CleanRow>().enumerate() {
        // header is line 1
        let line = index as u64 + 2;
        records.push(row?.into_record(line)?);
    }

    Ok(records)
}
