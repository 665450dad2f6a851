//! Raw conversion export reader

use crate::config::ColumnConfig;
use crate::domain::conversion::RawConversionRecord;
use crate::domain::{RelayError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

/// Canonical click-identifier column, accepted when the configured one is absent
pub const CANONICAL_CLICK_ID_COLUMN: &str = "gclid";

/// Positions of the columns the normalizer needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndices {
    click_id: usize,
    timestamp: usize,
    conversion_value: usize,
    campaign: usize,
}

impl ColumnIndices {
    fn resolve(headers: &StringRecord, columns: &ColumnConfig) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                RelayError::InvalidInput(format!("required column '{name}' not found in header"))
            })
        };

        let click_id = find(&columns.click_id)
            .or_else(|| find(CANONICAL_CLICK_ID_COLUMN))
            .ok_or_else(|| {
                RelayError::InvalidInput(format!(
                    "click identifier column '{}' (or '{}') not found in header",
                    columns.click_id, CANONICAL_CLICK_ID_COLUMN
                ))
            })?;

        Ok(Self {
            click_id,
            timestamp: require(&columns.timestamp)?,
            conversion_value: require(&columns.conversion_value)?,
            campaign: require(&columns.campaign)?,
        })
    }

    fn extract(&self, row: &StringRecord) -> RawConversionRecord {
        let cell = |index: usize| row.get(index).unwrap_or("");

        let click_id = Some(cell(self.click_id).to_string()).filter(|id| !id.is_empty());
        let conversion_value = cell(self.conversion_value)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| !value.is_nan());

        RawConversionRecord {
            click_id,
            raw_timestamp: cell(self.timestamp).to_string(),
            conversion_value,
            campaign: cell(self.campaign).to_string(),
        }
    }
}

/// Reads the raw export at `path`
///
/// Rows are returned in file order. Short rows are padded with empty cells and
/// columns other than the four configured ones are ignored.
///
/// # Errors
///
/// - [`RelayError::InputNotFound`] if the file does not exist
/// - [`RelayError::InvalidInput`] if a required column is missing or the CSV
///   is malformed
pub fn read_raw_records(path: &Path, columns: &ColumnConfig) -> Result<Vec<RawConversionRecord>> {
    if !path.exists() {
        return Err(RelayError::InputNotFound(path.display().to_string()));
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let indices = ColumnIndices::resolve(&headers, columns)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(indices.extract(&row));
    }

    tracing::debug!(
        path = %path.display(),
        rows = records.len(),
        "Read raw conversion export"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_configured_columns() {
        let file = write_csv(
            "order_id,google_click_id (gclid),timestamp,conversion_value,utm_campaign\n\
             1,ABC123,2024-01-15T10:30:00,150,spring_sale\n\
             2,,2024-01-16,50,spring_sale\n",
        );

        let records = read_raw_records(file.path(), &ColumnConfig::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].click_id.as_deref(), Some("ABC123"));
        assert_eq!(records[0].raw_timestamp, "2024-01-15T10:30:00");
        assert_eq!(records[0].conversion_value, Some(150.0));
        assert_eq!(records[0].campaign, "spring_sale");
        assert_eq!(records[1].click_id, None);
    }

    #[test]
    fn test_accepts_canonical_click_id_column() {
        let file = write_csv(
            "gclid,timestamp,conversion_value,utm_campaign\nXYZ,2024-01-15,10,c\n",
        );

        let records = read_raw_records(file.path(), &ColumnConfig::default()).unwrap();
        assert_eq!(records[0].click_id.as_deref(), Some("XYZ"));
    }

    #[test]
    fn test_unparseable_value_becomes_none() {
        let file = write_csv(
            "gclid,timestamp,conversion_value,utm_campaign\nA,x,abc,c\nB,x,,c\nC,x, 12.5 ,c\n",
        );

        let records = read_raw_records(file.path(), &ColumnConfig::default()).unwrap();
        assert_eq!(records[0].conversion_value, None);
        assert_eq!(records[1].conversion_value, None);
        assert_eq!(records[2].conversion_value, Some(12.5));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let file = write_csv("gclid,timestamp,conversion_value,utm_campaign\nA,2024-01-15\n");

        let records = read_raw_records(file.path(), &ColumnConfig::default()).unwrap();
        assert_eq!(records[0].conversion_value, None);
        assert_eq!(records[0].campaign, "");
    }

    #[test]
    fn test_missing_column_is_invalid_input() {
        let file = write_csv("gclid,timestamp,utm_campaign\nA,2024-01-15,c\n");

        let err = read_raw_records(file.path(), &ColumnConfig::default()).unwrap_err();
        assert!(matches!(err, RelayError::InvalidInput(_)));
        assert!(err.to_string().contains("conversion_value"));
    }

    #[test]
    fn test_missing_click_id_column_is_invalid_input() {
        let file = write_csv("timestamp,conversion_value,utm_campaign\n2024-01-15,1,c\n");

        let err = read_raw_records(file.path(), &ColumnConfig::default()).unwrap_err();
        assert!(err.to_string().contains("google_click_id (gclid)"));
    }

    #[test]
    fn test_missing_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            read_raw_records(&dir.path().join("absent.csv"), &ColumnConfig::default()).unwrap_err();
        assert!(matches!(err, RelayError::InputNotFound(_)));
    }
}
