//! Upload state machine
//!
//! Each record moves `Pending -> Attempting -> {Succeeded | Exhausted}`. A
//! failed attempt is followed by a non-blocking backoff sleep unless it was
//! the last one allowed by the [`RetryPolicy`].

use super::registry::ConversionActionRegistry;
use super::retry::RetryPolicy;
use crate::adapters::delivery::ConversionDelivery;
use crate::config::UploadConfig;
use crate::domain::conversion::CleanConversionRecord;
use crate::domain::errors::DeliveryError;
use crate::domain::ids::ActionId;
use crate::domain::outcome::UploadOutcome;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

/// Default bound on a single delivery call
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Uploads clean records through a [`ConversionDelivery`] with bounded retries
///
/// # Examples
///
/// ```
/// use conversion_relay::adapters::delivery::ScriptedDelivery;
/// use conversion_relay::core::upload::{ConversionActionRegistry, Uploader};
/// use conversion_relay::domain::{ActionId, CleanConversionRecord, ClickId};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let delivery = Arc::new(ScriptedDelivery::always_succeeding(ActionId::new("1234567890")?));
/// let uploader = Uploader::new(delivery, "offline_purchase");
/// let mut registry = ConversionActionRegistry::new();
///
/// let record = CleanConversionRecord::new(ClickId::new("ABC123")?, None, 150.0, "spring_sale")?;
/// let outcomes = uploader.upload(&[record], &mut registry).await;
///
/// assert!(outcomes[0].is_success());
/// assert!(registry.contains("offline_purchase"));
/// # Ok(())
/// # }
/// ```
pub struct Uploader {
    delivery: Arc<dyn ConversionDelivery>,
    policy: RetryPolicy,
    attempt_timeout: Duration,
    concurrency: usize,
    conversion_action: String,
}

impl Uploader {
    /// Creates an uploader with the default retry policy, sequential processing
    pub fn new(delivery: Arc<dyn ConversionDelivery>, conversion_action: impl Into<String>) -> Self {
        Self {
            delivery,
            policy: RetryPolicy::default(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            concurrency: 1,
            conversion_action: conversion_action.into(),
        }
    }

    /// Creates an uploader from the upload configuration
    pub fn from_config(delivery: Arc<dyn ConversionDelivery>, config: &UploadConfig) -> Self {
        Self::new(delivery, config.conversion_action.clone())
            .with_retry_policy(RetryPolicy::from_config(config))
            .with_attempt_timeout(config.attempt_timeout())
            .with_concurrency(config.concurrency)
    }

    /// Sets the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the bound on a single delivery call
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Sets how many records may be in flight at once (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Retry policy in use
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Conversion action the records are attributed to
    pub fn conversion_action(&self) -> &str {
        &self.conversion_action
    }

    /// Makes sure the conversion action exists before any upload
    ///
    /// Returns `true` when the action had to be created.
    pub fn prepare(&self, registry: &mut ConversionActionRegistry) -> bool {
        registry.ensure(&self.conversion_action)
    }

    /// Uploads every record and returns one outcome per record, in input order
    ///
    /// Failures never abort the batch; a record that exhausts its attempts
    /// yields a failure outcome and the next record proceeds.
    pub async fn upload(
        &self,
        records: &[CleanConversionRecord],
        registry: &mut ConversionActionRegistry,
    ) -> Vec<UploadOutcome> {
        self.prepare(registry);

        tracing::info!(
            records = records.len(),
            action = %self.conversion_action,
            endpoint = self.delivery.name(),
            max_attempts = self.policy.max_attempts(),
            concurrency = self.concurrency,
            "Uploading conversions"
        );

        stream::iter(records)
            .map(|record| self.upload_record(record))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Runs the attempt loop for a single record
    pub async fn upload_record(&self, record: &CleanConversionRecord) -> UploadOutcome {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            let result = self.attempt(record).await;
            crate::log_delivery_attempt!(record.click_id(), attempt, max_attempts, result);

            match result {
                Ok(action_id) => return UploadOutcome::success(record, action_id, attempt),
                Err(_) => match self.policy.delay_after(attempt) {
                    Some(delay) => {
                        crate::log_retry_attempt!(
                            record.click_id(),
                            attempt + 1,
                            max_attempts,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        tracing::error!(
                            gclid = %record.click_id(),
                            attempts = attempt,
                            "Conversion upload failed after all attempts"
                        );
                        return UploadOutcome::failure(record, attempt);
                    }
                },
            }
        }
    }

    async fn attempt(
        &self,
        record: &CleanConversionRecord,
    ) -> std::result::Result<ActionId, DeliveryError> {
        match tokio::time::timeout(self.attempt_timeout, self.delivery.attempt_delivery(record))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout(self.attempt_timeout)),
        }
    }
}
