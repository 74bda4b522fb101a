// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff with jitter for retrying transient container driver
//! failures.

use rand::Rng;
use std::time::Duration;

/// Retry policy for operations that can fail with a transient error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Delay before the first retry.
    pub base: Duration,
    /// Multiplier applied to the delay after each attempt.
    pub factor: f64,
    /// Fraction of the computed delay randomized in either direction.
    pub jitter: f64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(100),
            factor: 2.0,
            jitter: 0.2,
            max_retries: 3,
        }
    }
}

impl RetryConfig {
    /// Delay before the `attempt`-th retry (0-indexed), before jitter.
    fn base_delay(&self, attempt: u32) -> Duration {
        let millis = self.base.as_millis() as f64 * self.factor.powi(attempt as i32);
        Duration::from_millis(millis.round() as u64)
    }

    /// Delay before the `attempt`-th retry, with jitter applied.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        if self.jitter <= 0.0 {
            return base;
        }
        let spread = base.as_secs_f64() * self.jitter;
        let offset = rand::rng().random_range(-spread..=spread);
        let jittered = (base.as_secs_f64() + offset).max(0.0);
        Duration::from_secs_f64(jittered)
    }
}

/// Runs `f` up to `config.max_retries + 1` total attempts, sleeping between
/// attempts with jittered exponential backoff. Only errors for which
/// `is_retryable` returns `true` are retried; a non-retryable error or one
/// surviving past `max_retries` is returned immediately.
pub async fn retry_transient<T, E, F, Fut, P>(
    config: &RetryConfig,
    mut f: F,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= config.max_retries || !is_retryable(&err) {
                    return Err(err);
                }
                let delay = config.delay_for(attempt);
                tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying after transient error");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
