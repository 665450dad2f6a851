//! Permissive timestamp parsing
//!
//! Source exports carry timestamps in whatever format the upstream system
//! produced. Anything recognisable is normalized to UTC; anything else yields
//! `None` so the caller can keep the record with an empty timestamp.

use crate::domain::conversion::ConversionTime;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Formats carrying an explicit UTC offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Naive formats, interpreted as UTC
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats, interpreted as midnight UTC
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

/// Parses a raw timestamp into a normalized UTC conversion time
///
/// Returns `None` for empty or unrecognised input; never fails.
///
/// # Examples
///
/// ```
/// use conversion_relay::core::normalize::parse_timestamp;
///
/// let time = parse_timestamp("2024-01-15T10:30:00").unwrap();
/// assert_eq!(time.to_string(), "2024-01-15 10:30:00+00:00");
///
/// let shifted = parse_timestamp("2024-01-15T12:30:00+02:00").unwrap();
/// assert_eq!(shifted.to_string(), "2024-01-15 10:30:00+00:00");
///
/// assert!(parse_timestamp("not a date").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<ConversionTime> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(ConversionTime::new(dt.with_timezone(&Utc)));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(ConversionTime::new(dt.with_timezone(&Utc)));
        }
    }

    parse_naive(strip_utc_suffix(text)).map(|naive| ConversionTime::new(naive.and_utc()))
}

fn strip_utc_suffix(text: &str) -> &str {
    text.strip_suffix('Z')
        .or_else(|| text.strip_suffix("UTC"))
        .map(str::trim_end)
        .unwrap_or(text)
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2024-01-15T10:30:00", "2024-01-15 10:30:00+00:00" ; "iso without offset")]
    #[test_case("2024-01-15 10:30:00", "2024-01-15 10:30:00+00:00" ; "space separator")]
    #[test_case("2024-01-15T10:30:00.123456", "2024-01-15 10:30:00+00:00" ; "fractional seconds")]
    #[test_case("2024-01-15T10:30:00Z", "2024-01-15 10:30:00+00:00" ; "zulu suffix")]
    #[test_case("2024-01-15 10:30:00Z", "2024-01-15 10:30:00+00:00" ; "zulu with space separator")]
    #[test_case("2024-01-15 10:30:00 UTC", "2024-01-15 10:30:00+00:00" ; "utc suffix")]
    #[test_case("2024-01-15T12:30:00+02:00", "2024-01-15 10:30:00+00:00" ; "positive offset")]
    #[test_case("2024-01-15 05:30:00-05:00", "2024-01-15 10:30:00+00:00" ; "negative offset")]
    #[test_case("2024-01-15 10:30:00+00:00", "2024-01-15 10:30:00+00:00" ; "already normalized")]
    #[test_case("2024-01-15T10:30", "2024-01-15 10:30:00+00:00" ; "minutes precision")]
    #[test_case("2024-01-15", "2024-01-15 00:00:00+00:00" ; "date only")]
    #[test_case("20240115", "2024-01-15 00:00:00+00:00" ; "compact date")]
    #[test_case("2024/01/15 10:30:00", "2024-01-15 10:30:00+00:00" ; "slashed ymd")]
    #[test_case("01/15/2024 10:30", "2024-01-15 10:30:00+00:00" ; "us style")]
    #[test_case("01/15/2024", "2024-01-15 00:00:00+00:00" ; "us style date only")]
    #[test_case("  2024-01-15T10:30:00  ", "2024-01-15 10:30:00+00:00" ; "surrounding whitespace")]
    fn test_parse_timestamp_accepts(raw: &str, expected: &str) {
        let parsed = parse_timestamp(raw).expect("timestamp should parse");
        assert_eq!(parsed.to_string(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("not a date" ; "text")]
    #[test_case("2024-13-45" ; "impossible date")]
    #[test_case("2024-01-15T25:00:00" ; "impossible hour")]
    #[test_case("yesterday" ; "relative")]
    fn test_parse_timestamp_rejects(raw: &str) {
        assert!(parse_timestamp(raw).is_none());
    }

    #[test]
    fn test_parse_timestamp_is_deterministic() {
        let first = parse_timestamp("2024-03-10T08:00:00").unwrap();
        let second = parse_timestamp("2024-03-10T08:00:00").unwrap();
        assert_eq!(first, second);
    }
}
