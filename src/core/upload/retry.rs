//! Retry policy with exponential backoff

use crate::config::UploadConfig;
use std::time::Duration;

/// Bounded retry policy
///
/// A record gets at most `max_attempts` delivery attempts. The delay before
/// attempt `k + 1` is `initial_backoff * 2^(k - 1)`, optionally capped at
/// `max_backoff`. There is never a delay after the final attempt.
///
/// # Examples
///
/// ```
/// use conversion_relay::core::upload::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, Duration::from_secs(1));
/// assert_eq!(policy.delay_after(1), Some(Duration::from_secs(1)));
/// assert_eq!(policy.delay_after(2), Some(Duration::from_secs(2)));
/// assert_eq!(policy.delay_after(3), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Option<Duration>,
}

impl RetryPolicy {
    /// Creates an uncapped doubling policy
    ///
    /// `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff: None,
        }
    }

    /// Caps every single backoff delay at `max_backoff`
    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = Some(max_backoff.max(self.initial_backoff));
        self
    }

    /// Builds the policy from the upload configuration
    pub fn from_config(config: &UploadConfig) -> Self {
        let policy = Self::new(config.max_attempts, config.initial_backoff());
        match config.max_backoff() {
            Some(cap) => policy.with_max_backoff(cap),
            None => policy,
        }
    }

    /// Maximum attempts per record, always at least 1
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the second attempt
    pub fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    /// Cap on a single delay, `None` when delays double without bound
    pub fn max_backoff(&self) -> Option<Duration> {
        self.max_backoff
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    ///
    /// Returns `None` once the attempt bound is reached. A delay too large
    /// to represent saturates at the cap, or at `Duration::MAX` without one.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }

        let ceiling = self.max_backoff.unwrap_or(Duration::MAX);
        let delay = 2u32
            .checked_pow(attempt - 1)
            .and_then(|factor| self.initial_backoff.checked_mul(factor))
            .unwrap_or(ceiling);
        Some(delay.min(ceiling))
    }

    /// Every delay the policy can insert for one record, in order
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts)
            .filter_map(|attempt| self.delay_after(attempt))
            .collect()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
