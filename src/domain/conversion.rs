//! Conversion domain model
//!
//! Raw records as they arrive from the export file and the clean records the
//! normalizer hands to the uploader.

use super::errors::RelayError;
use super::ids::ClickId;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Values strictly above this are bucketed as [`ValueCategory::High`]
pub const HIGH_VALUE_THRESHOLD: f64 = 100.0;

/// Wire format expected by the ads API for conversion timestamps
pub const CONVERSION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00:00";

/// A conversion row exactly as read from the source export
///
/// Nothing is validated here. The click identifier may be missing, the
/// timestamp may be in any format, and a value that failed to parse as a
/// number is carried as `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawConversionRecord {
    /// Click identifier, if the cell was non-empty
    pub click_id: Option<String>,

    /// Timestamp text in whatever format the source used
    pub raw_timestamp: String,

    /// Conversion value, if the cell held a number
    pub conversion_value: Option<f64>,

    /// Campaign tag (utm_campaign)
    pub campaign: String,
}

/// Conversion timestamp normalized to UTC
///
/// Renders as `YYYY-MM-DD HH:MM:SS+00:00`, the format the ads API accepts.
///
/// # Examples
///
/// ```
/// use conversion_relay::domain::conversion::ConversionTime;
/// use std::str::FromStr;
///
/// let time = ConversionTime::from_str("2024-01-15 10:30:00+00:00").unwrap();
/// assert_eq!(time.to_string(), "2024-01-15 10:30:00+00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConversionTime(DateTime<Utc>);

impl ConversionTime {
    /// Wraps a UTC timestamp, dropping sub-second precision
    pub fn new(time: DateTime<Utc>) -> Self {
        Self(time.with_nanosecond(0).unwrap_or(time))
    }

    /// Returns the underlying UTC timestamp
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for ConversionTime {
    fn from(time: DateTime<Utc>) -> Self {
        Self::new(time)
    }
}

impl fmt::Display for ConversionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CONVERSION_TIME_FORMAT))
    }
}

impl FromStr for ConversionTime {
    type Err = RelayError;

    /// Parses the normalized wire format only
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S%:z")
            .map(|dt| Self::new(dt.with_timezone(&Utc)))
            .map_err(|e| RelayError::Validation(format!("invalid conversion time '{s}': {e}")))
    }
}

impl Serialize for ConversionTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ConversionTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Value bucket derived from the conversion value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueCategory {
    /// Value strictly greater than 100
    High,
    /// Everything else, including exactly 100
    Low,
}

impl ValueCategory {
    /// Buckets a conversion value
    pub fn from_value(value: f64) -> Self {
        if value > HIGH_VALUE_THRESHOLD {
            ValueCategory::High
        } else {
            ValueCategory::Low
        }
    }

    /// Returns the category label used in output files
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueCategory::High => "High",
            ValueCategory::Low => "Low",
        }
    }
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated conversion ready for upload
///
/// The click identifier is always present and the value is always a finite,
/// strictly positive number. The value category is derived on construction
/// and cannot drift from the value.
///
/// # Examples
///
/// ```
/// use conversion_relay::domain::conversion::{CleanConversionRecord, ValueCategory};
/// use conversion_relay::domain::ids::ClickId;
///
/// let record = CleanConversionRecord::new(
///     ClickId::new("ABC123").unwrap(),
///     None,
///     150.0,
///     "spring_sale",
/// )
/// .unwrap();
/// assert_eq!(record.value_category(), ValueCategory::High);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CleanConversionRecord {
    click_id: ClickId,
    conversion_time: Option<ConversionTime>,
    conversion_value: f64,
    campaign: String,
    value_category: ValueCategory,
}

impl CleanConversionRecord {
    /// Creates a clean record, deriving its value category
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] if the value is not a finite number
    /// greater than zero
    pub fn new(
        click_id: ClickId,
        conversion_time: Option<ConversionTime>,
        conversion_value: f64,
        campaign: impl Into<String>,
    ) -> super::Result<Self> {
        if !conversion_value.is_finite() || conversion_value <= 0.0 {
            return Err(RelayError::Validation(format!(
                "conversion value must be greater than 0, got {conversion_value}"
            )));
        }

        Ok(Self {
            click_id,
            conversion_time,
            conversion_value,
            campaign: campaign.into(),
            value_category: ValueCategory::from_value(conversion_value),
        })
    }

    /// Click identifier
    pub fn click_id(&self) -> &ClickId {
        &self.click_id
    }

    /// Normalized timestamp, `None` when the source timestamp was unparseable
    pub fn conversion_time(&self) -> Option<ConversionTime> {
        self.conversion_time
    }

    /// Conversion value
    pub fn conversion_value(&self) -> f64 {
        self.conversion_value
    }

    /// Campaign tag
    pub fn campaign(&self) -> &str {
        &self.campaign
    }

    /// Derived value bucket
    pub fn value_category(&self) -> ValueCategory {
        self.value_category
    }
}
