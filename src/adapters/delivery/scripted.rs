//! Scripted delivery endpoint
//!
//! Replays a fixed sequence of per-attempt results. Used to exercise the
//! retry state machine with exact failure patterns.

use super::traits::ConversionDelivery;
use crate::domain::conversion::CleanConversionRecord;
use crate::domain::errors::DeliveryError;
use crate::domain::ids::{ActionId, ClickId};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Result of one scripted attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAttempt {
    /// Accept the conversion
    Accept,
    /// Reject the conversion
    Reject,
    /// Take this long before accepting (for timeout handling)
    Stall(Duration),
}

/// Delivery endpoint driven by per-record scripts
///
/// Each click ID has its own queue of attempt results. When a queue runs out
/// the `fallback` result is used.
#[derive(Debug)]
pub struct ScriptedDelivery {
    action_id: ActionId,
    fallback: ScriptedAttempt,
    scripts: Mutex<HashMap<ClickId, VecDeque<ScriptedAttempt>>>,
    calls: Mutex<Vec<ClickId>>,
}

impl ScriptedDelivery {
    /// Creates an endpoint that answers every unscripted attempt with `fallback`
    pub fn new(action_id: ActionId, fallback: ScriptedAttempt) -> Self {
        Self {
            action_id,
            fallback,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Endpoint that rejects every attempt
    pub fn always_failing(action_id: ActionId) -> Self {
        Self::new(action_id, ScriptedAttempt::Reject)
    }

    /// Endpoint that accepts every attempt
    pub fn always_succeeding(action_id: ActionId) -> Self {
        Self::new(action_id, ScriptedAttempt::Accept)
    }

    /// Scripts the attempt results for one click ID
    pub fn with_script(
        self,
        click_id: ClickId,
        attempts: impl IntoIterator<Item = ScriptedAttempt>,
    ) -> Self {
        self.scripts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(click_id, attempts.into_iter().collect());
        self
    }

    /// Click IDs of every attempt made so far, in call order
    pub fn calls(&self) -> Vec<ClickId> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn next_attempt(&self, click_id: &ClickId) -> ScriptedAttempt {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(click_id.clone());

        self.scripts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get_mut(click_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl ConversionDelivery for ScriptedDelivery {
    async fn attempt_delivery(
        &self,
        record: &CleanConversionRecord,
    ) -> std::result::Result<ActionId, DeliveryError> {
        match self.next_attempt(record.click_id()) {
            ScriptedAttempt::Accept => Ok(self.action_id.clone()),
            ScriptedAttempt::Reject => Err(DeliveryError::Rejected(format!(
                "scripted rejection for gclid {}",
                record.click_id()
            ))),
            ScriptedAttempt::Stall(duration) => {
                tokio::time::sleep(duration).await;
                Ok(self.action_id.clone())
            }
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
