//! Exponential backoff retry for provider calls.
//!
//! The base design treats backend calls as timeout-able network operations:
//! bounded attempts, exponential delay with jitter, rate-limit aware.

use super::error::{ProviderError, Result};
use std::future::Future;
use std::time::Duration;

/// Retry policy for a provider call.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling for the backoff delay.
    pub max_delay: Duration,
    /// Multiplier applied per attempt.
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let jitter = 1.0 + (rand::random::<f64>() - 0.5) * 0.2;
        let millis = (base * jitter).min(self.max_delay.as_millis() as f64);
        Duration::from_millis(millis as u64)
    }
}

/// Run `operation` up to `config.max_attempts` times, sleeping with
/// exponential backoff between retryable failures.
pub async fn retry_with_backoff<T, F, Fut>(mut operation: F, config: &RetryConfig) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt + 1 < config.max_attempts => {
                let delay = config.delay_for(attempt);
                tracing::warn!(
                    "Provider call failed (attempt {}/{}), retrying in {:?}: {}",
                    attempt + 1,
                    config.max_attempts,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
