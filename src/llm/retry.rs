// ============================================
// PETDIAG - Retry Logic with Exponential Backoff
// ============================================

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry; also the floor for every delay
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Config that never waits, for callers that drive fakes
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Delay after the given failed attempt (0-based), clamped to
    /// `[initial_delay, max_delay]`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);

        let floor = self.initial_delay.as_millis() as f64;
        let cap = (self.max_delay.as_millis() as f64).max(floor);
        let delay_ms = base_ms.clamp(floor, cap);

        Duration::from_millis(delay_ms as u64)
    }
}

/// Error classification for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Should retry
    Retry,
    /// Should not retry (permanent error)
    NoRetry,
}

/// Errors that know whether another attempt could help.
pub trait Retryable {
    fn retry_decision(&self) -> RetryDecision;
}

/// Execute an async operation with retry logic.
///
/// The last error is returned unchanged once attempts run out, so callers
/// can still tell an overload apart from other failures.
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let err = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };
        attempt += 1;

        if attempt >= max_attempts {
            tracing::error!("Attempt {}/{} failed: {}. Giving up", attempt, max_attempts, err);
            return Err(err);
        }

        if err.retry_decision() == RetryDecision::NoRetry {
            tracing::error!("Permanent error, not retrying: {}", err);
            return Err(err);
        }

        let delay = config.delay_for_attempt(attempt - 1);
        tracing::warn!(
            "Attempt {}/{} failed: {}. Retrying in {:?}...",
            attempt,
            max_attempts,
            err,
            delay
        );
        sleep(delay).await;
    }
}
