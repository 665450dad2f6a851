//! Upload summary and reporting

use crate::domain::outcome::UploadOutcome;
use serde::Serialize;
use std::time::Duration;

/// Summary of an upload run
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    /// Identifier of the run, also attached to every log line
    pub run_id: String,

    /// Clean records considered
    pub total_records: usize,

    /// Records delivered
    pub successful_uploads: usize,

    /// Records that exhausted their attempts
    pub failed_uploads: usize,

    /// Delivery attempts made across all records
    pub total_attempts: u64,

    /// Records that needed more than one attempt
    pub retried_records: usize,

    /// Wall-clock duration of the upload
    #[serde(serialize_with = "serialize_duration_secs", rename = "duration_secs")]
    pub duration: Duration,

    /// Where the audit log was written, if it was
    pub log_path: Option<String>,

    /// Whether delivery was skipped
    pub dry_run: bool,
}

impl UploadSummary {
    /// Create a new empty upload summary
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            total_records: 0,
            successful_uploads: 0,
            failed_uploads: 0,
            total_attempts: 0,
            retried_records: 0,
            duration: Duration::from_secs(0),
            log_path: None,
            dry_run: false,
        }
    }

    /// Aggregates a set of outcomes
    ///
    /// Failures are derived as `total - successes`.
    pub fn from_outcomes(run_id: impl Into<String>, outcomes: &[UploadOutcome]) -> Self {
        let mut summary = Self::new(run_id);
        summary.total_records = outcomes.len();
        summary.successful_uploads = outcomes.iter().filter(|o| o.is_success()).count();
        summary.failed_uploads = summary.total_records - summary.successful_uploads;
        summary.total_attempts = outcomes.iter().map(|o| u64::from(o.attempts)).sum();
        summary.retried_records = outcomes.iter().filter(|o| o.attempts > 1).count();
        summary
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the audit log location
    pub fn with_log_path(mut self, log_path: impl Into<String>) -> Self {
        self.log_path = Some(log_path.into());
        self
    }

    /// Check if every record was delivered
    pub fn is_successful(&self) -> bool {
        self.failed_uploads == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 100.0;
        }
        (self.successful_uploads as f64 / self.total_records as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        crate::log_upload_complete!(self);

        if self.failed_uploads > 0 {
            tracing::warn!(
                run_id = %self.run_id,
                failed = self.failed_uploads,
                "Upload completed with failures"
            );
        }
    }
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
    use crate::domain::conversion::CleanConversionRecord;
    use crate::domain::ids::{ActionId, ClickId};

    fn record(id: &str) -> CleanConversionRecord {
        CleanConversionRecord::new(ClickId::new(id).unwrap(), None, 10.0, "c").unwrap()
    }

    #[test]
    fn test_upload_summary_creation() {
        let summary = UploadSummary::new("run-1");

        assert_eq!(summary.run_id, "run-1");
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.successful_uploads, 0);
        assert_eq!(summary.failed_uploads, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.log_path.is_none());
        assert!(summary.is_successful());
    }

    #[test]
    fn test_from_outcomes_counts() {
        let action = ActionId::new("1234567890").unwrap();
        let outcomes = vec![
            UploadOutcome::success(&record("A"), action.clone(), 1),
            UploadOutcome::success(&record("B"), action, 2),
            UploadOutcome::failure(&record("C"), 3),
        ];

        let summary = UploadSummary::from_outcomes("run-2", &outcomes);

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.successful_uploads, 2);
        assert_eq!(summary.failed_uploads, 1);
        assert_eq!(summary.total_attempts, 6);
        assert_eq!(summary.retried_records, 2);
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_success_rate() {
        let mut summary = UploadSummary::new("run-3");
        summary.total_records = 20;
        summary.successful_uploads = 19;
        assert_eq!(summary.success_rate(), 95.0);

        summary.total_records = 0;
        assert_eq!(summary.success_rate(), 100.0);
    }

    #[test]
    fn test_summary_serializes_duration_as_seconds() {
        let summary = UploadSummary::new("run-4")
            .with_duration(Duration::from_millis(1500))
            .with_log_path("output/upload_log.csv");

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["duration_secs"], 1.5);
        assert_eq!(json["log_path"], "output/upload_log.csv");
        assert_eq!(json["run_id"], "run-4");
    }
}
