//! Retry policy helpers.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;
use crate::error::TransportError;

/// Retry decision result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after a delay.
    RetryAfter(Duration),
    /// Do not retry.
    DoNotRetry,
}

/// Exponential backoff policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum jitter to add to delays.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            max_jitter: Duration::from_millis(config.jitter_ms),
        }
    }
}

impl RetryPolicy {
    /// A policy that performs exactly one attempt.
    #[must_use]
    pub const fn never() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// Decide whether to retry based on the error and attempt count.
    ///
    /// A server-supplied `Retry-After` replaces the computed backoff, capped
    /// at `max_delay`.
    #[must_use]
    pub fn decide(&self, error: &TransportError, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts || !error.is_retryable() {
            return RetryDecision::DoNotRetry;
        }

        let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        let delay_ms = if let Some(retry_after) = error.retry_after() {
            u64::try_from(retry_after.as_millis()).unwrap_or(u64::MAX)
        } else {
            let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
            base_ms.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)))
        }
        .min(max_ms);

        let jitter_ms = if self.max_jitter.is_zero() {
            0
        } else {
            let jitter_max = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
            rand::thread_rng().gen_range(0..=jitter_max)
        };
        RetryDecision::RetryAfter(Duration::from_millis(delay_ms.saturating_add(jitter_ms)))
    }
}
