//! Pipeline coordinator - runs the normalize and upload stages
//!
//! The two stages only communicate through the clean file, so either can run
//! on its own. Every fatal condition is detected before the stage writes
//! anything.

use super::summary::{NormalizeSummary, PipelineSummary};
use crate::adapters::delivery::{ConversionDelivery, SimulatedDelivery};
use crate::adapters::tabular::{
    read_clean_records, read_raw_records, write_clean_records, write_outcomes,
};
use crate::config::RelayConfig;
use crate::core::normalize::normalize;
use crate::core::upload::{ConversionActionRegistry, UploadSummary, Uploader};
use crate::domain::{RelayError, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Pipeline coordinator
pub struct PipelineCoordinator {
    config: RelayConfig,
    delivery: Arc<dyn ConversionDelivery>,
    run_id: String,
}

impl PipelineCoordinator {
    /// Creates a coordinator that uploads to the simulated endpoint
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Configuration`] if the configuration is invalid
    pub fn new(config: RelayConfig) -> Result<Self> {
        let delivery = SimulatedDelivery::from_config(&config.upload.simulation)?;
        Self::with_delivery(config, Arc::new(delivery))
    }

    /// Creates a coordinator with a caller-supplied delivery endpoint
    pub fn with_delivery(config: RelayConfig, delivery: Arc<dyn ConversionDelivery>) -> Result<Self> {
        config.validate().map_err(RelayError::Configuration)?;

        Ok(Self {
            config,
            delivery,
            run_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    /// Identifier attached to every log line of this run
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Configuration in use
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Reads the raw export, normalizes it and writes the clean file
    ///
    /// # Errors
    ///
    /// Fails without writing anything if the raw export is missing or
    /// malformed. Dropped records are never errors.
    pub fn normalize(&self) -> Result<NormalizeSummary> {
        self.normalize_stage(true)
    }

    /// Reads and normalizes the raw export without writing the clean file
    pub fn normalize_dry_run(&self) -> Result<NormalizeSummary> {
        self.normalize_stage(false)
    }

    fn normalize_stage(&self, write_output: bool) -> Result<NormalizeSummary> {
        let span = tracing::info_span!("normalize", run_id = %self.run_id);
        let _enter = span.enter();

        let start_time = Instant::now();
        let settings = &self.config.normalize;
        crate::log_stage_start!("normalize", self.run_id, settings.input_path);

        let raw = read_raw_records(Path::new(&settings.input_path), &settings.columns)?;
        let normalized = normalize(&raw);
        if write_output {
            write_clean_records(Path::new(&settings.output_path), &normalized.records)?;
        } else {
            tracing::info!(
                records = normalized.records.len(),
                "Dry run: skipping clean file"
            );
        }

        let summary = NormalizeSummary {
            run_id: self.run_id.clone(),
            input_path: settings.input_path.clone(),
            output_path: settings.output_path.clone(),
            report: normalized.report,
            duration: start_time.elapsed(),
        };
        summary.log_summary();

        Ok(summary)
    }

    /// Reads the clean file and uploads every record
    ///
    /// In dry-run mode the input and the conversion action are checked but no
    /// delivery is attempted and no audit log is written.
    ///
    /// # Errors
    ///
    /// Fails before any attempt if the clean file is missing or malformed, or
    /// if the audit log cannot be written. Per-record upload failures are
    /// reported in the summary, not as errors.
    pub async fn upload(&self, registry: &mut ConversionActionRegistry) -> Result<UploadSummary> {
        let span = tracing::info_span!("upload", run_id = %self.run_id);
        self.upload_stage(registry).instrument(span).await
    }

    async fn upload_stage(&self, registry: &mut ConversionActionRegistry) -> Result<UploadSummary> {
        let start_time = Instant::now();
        let settings = &self.config.upload;
        crate::log_stage_start!("upload", self.run_id, settings.input_path);

        let records = read_clean_records(Path::new(&settings.input_path))?;
        let uploader = Uploader::from_config(self.delivery.clone(), settings);

        if settings.dry_run {
            uploader.prepare(registry);
            tracing::info!(
                records = records.len(),
                "Dry run: skipping delivery and audit log"
            );

            let mut summary = UploadSummary::new(self.run_id.clone());
            summary.total_records = records.len();
            summary.dry_run = true;
            let summary = summary.with_duration(start_time.elapsed());
            summary.log_summary();
            return Ok(summary);
        }

        let outcomes = uploader.upload(&records, registry).await;
        write_outcomes(Path::new(&settings.log_path), &outcomes)?;

        let summary = UploadSummary::from_outcomes(self.run_id.clone(), &outcomes)
            .with_log_path(settings.log_path.clone())
            .with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }

    /// Runs normalize, then uploads the file it produced
    ///
    /// The upload stage reads the normalizer's output path regardless of
    /// `upload.input_path`.
    pub async fn run(&self) -> Result<PipelineSummary> {
        let normalize = self.normalize()?;

        let mut staged = self.config.clone();
        staged.upload.input_path = normalize.output_path.clone();
        let stage = Self {
            config: staged,
            delivery: self.delivery.clone(),
            run_id: self.run_id.clone(),
        };

        let mut registry = ConversionActionRegistry::new();
        let upload = stage.upload(&mut registry).await?;

        Ok(PipelineSummary { normalize, upload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::delivery::ScriptedDelivery;
    use crate::domain::ids::ActionId;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> RelayConfig {
        let path = |name: &str| dir.path().join(name).to_string_lossy().to_string();
        let mut config = RelayConfig::default();
        config.normalize.input_path = path("conversions.csv");
        config.normalize.output_path = path("out/cleaned.csv");
        config.upload.input_path = path("out/cleaned.csv");
        config.upload.log_path = path("out/upload_log.csv");
        config
    }

    fn succeeding() -> Arc<ScriptedDelivery> {
        Arc::new(ScriptedDelivery::always_succeeding(
            ActionId::new("1234567890").unwrap(),
        ))
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = RelayConfig::default();
        config.upload.max_attempts = 0;

        let result = PipelineCoordinator::with_delivery(config, succeeding());
        assert!(matches!(result, Err(RelayError::Configuration(_))));
    }

    #[test]
    fn test_normalize_missing_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let coordinator = PipelineCoordinator::with_delivery(config_in(&dir), succeeding()).unwrap();

        let err = coordinator.normalize().unwrap_err();

        assert!(matches!(err, RelayError::InputNotFound(_)));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_normalize_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("conversions.csv"),
            "gclid,timestamp,conversion_value,utm_campaign\nA,2024-01-15,10,c\n",
        )
        .unwrap();
        let coordinator = PipelineCoordinator::with_delivery(config_in(&dir), succeeding()).unwrap();

        let summary = coordinator.normalize_dry_run().unwrap();

        assert_eq!(summary.report.valid_records, 1);
        assert!(!dir.path().join("out/cleaned.csv").exists());
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("conversions.csv"),
            "google_click_id (gclid),timestamp,conversion_value,utm_campaign\n\
             ABC123,2024-01-15T10:30:00,150,spring_sale\n\
             ,2024-01-15T11:00:00,50,spring_sale\n\
             DEF456,2024-01-16,-5,spring_sale\n",
        )
        .unwrap();

        let delivery = succeeding();
        let coordinator = PipelineCoordinator::with_delivery(config_in(&dir), delivery.clone()).unwrap();
        let summary = coordinator.run().await.unwrap();

        assert_eq!(summary.normalize.report.total_records, 3);
        assert_eq!(summary.normalize.report.valid_records, 1);
        assert_eq!(summary.upload.total_records, 1);
        assert_eq!(summary.upload.successful_uploads, 1);
        assert_eq!(summary.upload.run_id, summary.normalize.run_id);
        assert_eq!(delivery.calls().len(), 1);

        let log = std::fs::read_to_string(dir.path().join("out/upload_log.csv")).unwrap();
        assert!(log.contains("SUCCESS,1234567890,ABC123,2024-01-15 10:30:00+00:00,150,,1"));
    }

    #[tokio::test]
    async fn test_dry_run_skips_delivery_and_log() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.upload.dry_run = true;
        std::fs::create_dir_all(dir.path().join("out")).unwrap();
        std::fs::write(
            dir.path().join("out/cleaned.csv"),
            "gclid,conversion_time,conversion_value,utm_campaign,value_bucket\nA,,10,c,Low\n",
        )
        .unwrap();

        let delivery = succeeding();
        let coordinator = PipelineCoordinator::with_delivery(config, delivery.clone()).unwrap();
        let mut registry = ConversionActionRegistry::new();
        let summary = coordinator.upload(&mut registry).await.unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.total_records, 1);
        assert!(summary.log_path.is_none());
        assert!(delivery.calls().is_empty());
        assert!(registry.contains("offline_purchase"));
        assert!(!dir.path().join("out/upload_log.csv").exists());
    }

    #[tokio::test]
    async fn test_upload_missing_clean_file() {
        let dir = TempDir::new().unwrap();
        let coordinator = PipelineCoordinator::with_delivery(config_in(&dir), succeeding()).unwrap();
        let mut registry = ConversionActionRegistry::new();

        let err = coordinator.upload(&mut registry).await.unwrap_err();

        assert!(err.is_input_error());
        assert!(registry.is_empty());
    }
}
