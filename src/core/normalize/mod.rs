//! Conversion normalization
//!
//! Turns raw export rows into the clean record set expected by the ads API:
//!
//! 1. The click identifier is taken from the configured source column
//! 2. Timestamps are parsed permissively and rendered in UTC
//! 3. Rows without a click identifier or with a non-positive value are dropped
//! 4. Each kept row is bucketed as `High` (value > 100) or `Low`
//! 5. Only the five clean columns are kept
//!
//! The pass is pure: the same input always yields the same output, in the
//! same order.

pub mod timestamp;

pub use timestamp::parse_timestamp;

use crate::domain::conversion::{CleanConversionRecord, RawConversionRecord};
use crate::domain::ids::ClickId;
use serde::Serialize;

/// Why a raw record was left out of the clean set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Click identifier missing, empty or whitespace-only
    MissingClickId,
    /// Conversion value missing, unparseable, not finite, zero or negative
    InvalidValue,
}

/// Counters describing a normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    /// Raw records read
    pub total_records: usize,

    /// Records kept in the clean set
    pub valid_records: usize,

    /// Records dropped for a missing click identifier
    pub dropped_missing_click_id: usize,

    /// Records dropped for a missing, non-finite or non-positive value
    pub dropped_invalid_value: usize,

    /// Kept records whose timestamp could not be parsed
    pub unparseable_timestamps: usize,
}

impl NormalizeReport {
    /// Total records excluded from the clean set
    pub fn dropped(&self) -> usize {
        self.dropped_missing_click_id + self.dropped_invalid_value
    }

    /// Log the report
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total_records,
            valid = self.valid_records,
            dropped = self.dropped(),
            dropped_missing_click_id = self.dropped_missing_click_id,
            dropped_invalid_value = self.dropped_invalid_value,
            unparseable_timestamps = self.unparseable_timestamps,
            "Normalization completed"
        );

        if self.unparseable_timestamps > 0 {
            tracing::warn!(
                count = self.unparseable_timestamps,
                "Some kept conversions have an empty conversion_time"
            );
        }
    }
}

/// Clean record set plus the report describing how it was produced
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Clean records, in input order
    pub records: Vec<CleanConversionRecord>,

    /// Pass counters
    pub report: NormalizeReport,
}

/// Normalizes a single raw record
///
/// Records missing a click identifier are reported as such even when their
/// value is also invalid.
///
/// # Errors
///
/// Returns the [`DropReason`] when the record does not belong in the clean set
pub fn normalize_record(raw: &RawConversionRecord) -> Result<CleanConversionRecord, DropReason> {
    let click_id = raw
        .click_id
        .as_deref()
        .and_then(|id| ClickId::new(id).ok())
        .ok_or(DropReason::MissingClickId)?;

    let value = raw
        .conversion_value
        .filter(|v| *v > 0.0)
        .ok_or(DropReason::InvalidValue)?;

    let conversion_time = parse_timestamp(&raw.raw_timestamp);

    CleanConversionRecord::new(click_id, conversion_time, value, raw.campaign.clone())
        .map_err(|_| DropReason::InvalidValue)
}

/// Normalizes a batch of raw records
///
/// Retained records keep their relative input order. Dropped records are only
/// counted; they never produce an error.
///
/// # Examples
///
/// ```
/// use conversion_relay::core::normalize::normalize;
/// use conversion_relay::domain::RawConversionRecord;
///
/// let raw = vec![
///     RawConversionRecord {
///         click_id: Some("ABC123".to_string()),
///         raw_timestamp: "2024-01-15T10:30:00".to_string(),
///         conversion_value: Some(150.0),
///         campaign: "spring_sale".to_string(),
///     },
///     RawConversionRecord {
///         click_id: Some(String::new()),
///         raw_timestamp: "2024-01-15T11:00:00".to_string(),
///         conversion_value: Some(50.0),
///         campaign: "spring_sale".to_string(),
///     },
/// ];
///
/// let normalized = normalize(&raw);
/// assert_eq!(normalized.records.len(), 1);
/// assert_eq!(normalized.report.dropped(), 1);
/// ```
pub fn normalize(raw_records: &[RawConversionRecord]) -> Normalized {
    let mut normalized = Normalized {
        records: Vec::with_capacity(raw_records.len()),
        report: NormalizeReport {
            total_records: raw_records.len(),
            ..NormalizeReport::default()
        },
    };

    for (index, raw) in raw_records.iter().enumerate() {
        match normalize_record(raw) {
            Ok(record) => {
                if record.conversion_time().is_none() {
                    tracing::debug!(
                        row = index + 1,
                        click_id = %record.click_id(),
                        raw_timestamp = %raw.raw_timestamp,
                        "Unparseable timestamp, keeping record with empty conversion_time"
                    );
                    normalized.report.unparseable_timestamps += 1;
                }
                normalized.records.push(record);
            }
            Err(DropReason::MissingClickId) => {
                normalized.report.dropped_missing_click_id += 1;
            }
            Err(DropReason::InvalidValue) => {
                normalized.report.dropped_invalid_value += 1;
            }
        }
    }

    normalized.report.valid_records = normalized.records.len();
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversion::ValueCategory;
    use test_case::test_case;

    fn raw(click_id: Option<&str>, timestamp: &str, value: Option<f64>) -> RawConversionRecord {
        RawConversionRecord {
            click_id: click_id.map(str::to_string),
            raw_timestamp: timestamp.to_string(),
            conversion_value: value,
            campaign: "spring_sale".to_string(),
        }
    }

    #[test]
    fn test_scenario_valid_high_value_record() {
        let record = normalize_record(&raw(Some("ABC123"), "2024-01-15T10:30:00", Some(150.0)))
            .unwrap();

        assert_eq!(record.click_id().as_str(), "ABC123");
        assert_eq!(
            record.conversion_time().unwrap().to_string(),
            "2024-01-15 10:30:00+00:00"
        );
        assert_eq!(record.conversion_value(), 150.0);
        assert_eq!(record.campaign(), "spring_sale");
        assert_eq!(record.value_category(), ValueCategory::High);
    }

    #[test]
    fn test_scenario_empty_click_id_dropped() {
        let result = normalize_record(&raw(Some(""), "2024-01-15T10:30:00", Some(50.0)));
        assert_eq!(result.unwrap_err(), DropReason::MissingClickId);
    }

    #[test]
    fn test_scenario_negative_value_dropped() {
        let result = normalize_record(&raw(Some("ABC123"), "2024-01-15T10:30:00", Some(-5.0)));
        assert_eq!(result.unwrap_err(), DropReason::InvalidValue);
    }

    #[test_case(None, Some(10.0), Some(DropReason::MissingClickId) ; "null click id")]
    #[test_case(Some("  "), Some(10.0), Some(DropReason::MissingClickId) ; "blank click id")]
    #[test_case(Some("G1"), Some(0.0), Some(DropReason::InvalidValue) ; "zero value")]
    #[test_case(Some("G1"), None, Some(DropReason::InvalidValue) ; "missing value")]
    #[test_case(Some("G1"), Some(f64::NAN), Some(DropReason::InvalidValue) ; "nan value")]
    #[test_case(None, Some(-1.0), Some(DropReason::MissingClickId) ; "both invalid")]
    #[test_case(Some("G1"), Some(0.01), None ; "smallest positive kept")]
    fn test_filter_boundaries(click_id: Option<&str>, value: Option<f64>, expected: Option<DropReason>) {
        let result = normalize_record(&raw(click_id, "2024-01-15", value));
        assert_eq!(result.err(), expected);
    }

    #[test]
    fn test_unparseable_timestamp_kept() {
        let normalized = normalize(&[raw(Some("G1"), "garbage", Some(20.0))]);

        assert_eq!(normalized.records.len(), 1);
        assert!(normalized.records[0].conversion_time().is_none());
        assert_eq!(normalized.report.unparseable_timestamps, 1);
        assert_eq!(normalized.report.dropped(), 0);
    }

    #[test]
    fn test_normalize_preserves_order_and_counts() {
        let input = vec![
            raw(Some("A"), "2024-01-01", Some(10.0)),
            raw(None, "2024-01-02", Some(10.0)),
            raw(Some("B"), "2024-01-03", Some(-1.0)),
            raw(Some("C"), "2024-01-04", Some(200.0)),
            raw(Some("D"), "2024-01-05", Some(100.0)),
        ];

        let normalized = normalize(&input);
        let ids: Vec<&str> = normalized
            .records
            .iter()
            .map(|r| r.click_id().as_str())
            .collect();

        assert_eq!(ids, vec!["A", "C", "D"]);
        assert_eq!(
            normalized.report,
            NormalizeReport {
                total_records: 5,
                valid_records: 3,
                dropped_missing_click_id: 1,
                dropped_invalid_value: 1,
                unparseable_timestamps: 0,
            }
        );
        assert_eq!(normalized.records[1].value_category(), ValueCategory::High);
        assert_eq!(normalized.records[2].value_category(), ValueCategory::Low);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = vec![
            raw(Some("A"), "2024-01-01T09:15:00", Some(10.0)),
            raw(Some("B"), "bad", Some(101.0)),
        ];

        let first = normalize(&input);
        let second = normalize(&input);
        assert_eq!(first.records, second.records);
        assert_eq!(first.report, second.report);
    }

    #[test]
    fn test_normalize_empty_input() {
        let normalized = normalize(&[]);
        assert!(normalized.records.is_empty());
        assert_eq!(normalized.report, NormalizeReport::default());
    }
}
