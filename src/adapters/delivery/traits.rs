//! Delivery capability trait
//!
//! This module defines the single seam between the retry state machine and
//! whatever actually receives conversions. The simulated endpoint implements
//! it today; a real ads API client would implement it without touching the
//! uploader.

use crate::domain::conversion::CleanConversionRecord;
use crate::domain::errors::DeliveryError;
use crate::domain::ids::ActionId;
use async_trait::async_trait;

/// Something that can accept one conversion per call
#[async_trait]
pub trait ConversionDelivery: Send + Sync {
    /// Makes one delivery attempt for `record`
    ///
    /// Implementations must not retry internally; the uploader owns the
    /// attempt count and the backoff between attempts.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] when this attempt was not accepted.
    async fn attempt_delivery(
        &self,
        record: &CleanConversionRecord,
    ) -> std::result::Result<ActionId, DeliveryError>;

    /// Short name used in log lines
    fn name(&self) -> &'static str;
}
