//! Simulated ads API endpoint
//!
//! Accepts each attempt independently with a fixed probability. No network
//! traffic is generated.

use super::traits::ConversionDelivery;
use crate::config::SimulationConfig;
use crate::domain::conversion::CleanConversionRecord;
use crate::domain::errors::DeliveryError;
use crate::domain::ids::ActionId;
use crate::domain::{RelayError, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Delivery endpoint that succeeds with probability `p` per attempt
///
/// # Examples
///
/// ```
/// use conversion_relay::adapters::delivery::{ConversionDelivery, SimulatedDelivery};
/// use conversion_relay::domain::{ActionId, CleanConversionRecord, ClickId};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let delivery = SimulatedDelivery::new(1.0, ActionId::new("1234567890")?, Some(7))?;
/// let record = CleanConversionRecord::new(ClickId::new("ABC123")?, None, 150.0, "spring_sale")?;
///
/// let action_id = delivery.attempt_delivery(&record).await?;
/// assert_eq!(action_id.as_str(), "1234567890");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SimulatedDelivery {
    success_probability: f64,
    action_id: ActionId,
    rng: Mutex<StdRng>,
}

impl SimulatedDelivery {
    /// Creates a simulated endpoint
    ///
    /// With a `seed` the sequence of decisions is reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if `success_probability` is outside `[0, 1]`
    pub fn new(success_probability: f64, action_id: ActionId, seed: Option<u64>) -> Result<Self> {
        if !(0.0..=1.0).contains(&success_probability) {
            return Err(RelayError::Configuration(format!(
                "success probability must be between 0.0 and 1.0, got {success_probability}"
            )));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            success_probability,
            action_id,
            rng: Mutex::new(rng),
        })
    }

    /// Creates a simulated endpoint from configuration
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let action_id = ActionId::new(config.action_id.clone()).map_err(RelayError::Configuration)?;
        Self::new(config.success_probability, action_id, config.seed)
    }

    /// Probability that a single attempt succeeds
    pub fn success_probability(&self) -> f64 {
        self.success_probability
    }

    fn draw(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen::<f64>()
    }
}

#[async_trait]
impl ConversionDelivery for SimulatedDelivery {
    async fn attempt_delivery(
        &self,
        record: &CleanConversionRecord,
    ) -> std::result::Result<ActionId, DeliveryError> {
        if self.draw() < self.success_probability {
            Ok(self.action_id.clone())
        } else {
            Err(DeliveryError::Rejected(format!(
                "simulated rejection for gclid {}",
                record.click_id()
            )))
        }
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
