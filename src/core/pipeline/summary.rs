//! Stage summaries

use crate::core::normalize::NormalizeReport;
use crate::core::upload::UploadSummary;
use serde::Serialize;
use std::time::Duration;

/// Summary of a normalization run
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeSummary {
    /// Identifier of the run
    pub run_id: String,

    /// Raw export that was read
    pub input_path: String,

    /// Clean file that was written
    pub output_path: String,

    /// Record counters
    #[serde(flatten)]
    pub report: NormalizeReport,

    /// Wall-clock duration
    #[serde(serialize_with = "serialize_duration_secs", rename = "duration_secs")]
    pub duration: Duration,
}

impl NormalizeSummary {
    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            output = %self.output_path,
            duration_ms = self.duration.as_millis() as u64,
            "Normalization finished"
        );
        self.report.log_summary();
    }
}

/// Summary of a full normalize-then-upload run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    /// Normalization stage
    pub normalize: NormalizeSummary,

    /// Upload stage
    pub upload: UploadSummary,
}

fn serialize_duration_secs<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_summary_flattens_report() {
        let summary = NormalizeSummary {
            run_id: "run-1".to_string(),
            input_path: "data/conversions.csv".to_string(),
            output_path: "output/cleaned_conversions.csv".to_string(),
            report: NormalizeReport {
                total_records: 4,
                valid_records: 2,
                dropped_missing_click_id: 1,
                dropped_invalid_value: 1,
                unparseable_timestamps: 0,
            },
            duration: Duration::from_millis(250),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_records"], 4);
        assert_eq!(json["dropped_missing_click_id"], 1);
        assert_eq!(json["duration_secs"], 0.25);
        assert!(json.get("report").is_none());
    }
}
