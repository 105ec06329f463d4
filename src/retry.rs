//! Bounded retries with exponential backoff.

use std::fmt::Display;
use std::time::Duration;

use tracing::warn;

use crate::config::RetryConfig;

/// Exponential backoff calculator.
///
/// Delays start at `base_ms` and double per attempt, never exceeding `max_ms`.
pub struct Backoff {
    base_ms: u64,
    max_ms: u64,
    attempt: u32,
}

impl Backoff {
    /// Create a new backoff starting at `base_ms` with a cap of `max_ms`.
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self {
            base_ms,
            max_ms,
            attempt: 0,
        }
    }

    /// Get the next delay duration and increment the attempt counter.
    pub fn next_delay(&mut self) -> Duration {
        let factor = 1u64.checked_shl(self.attempt).unwrap_or(u64::MAX);
        let exp = self.base_ms.saturating_mul(factor);
        self.attempt = self.attempt.saturating_add(1);
        Duration::from_millis(exp.min(self.max_ms))
    }
}

/// Runs `op` until it succeeds, fails with a non-transient error, or
/// `config.max_attempts` attempts have been made.
///
/// `op` receives the 1-based attempt number. The error of the last attempt is
/// returned unchanged when retries are exhausted.
pub fn with_retry<T, E, F, P>(config: &RetryConfig, mut op: F, is_transient: P) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut backoff = Backoff::new(config.base_delay_ms, config.max_delay_ms);
    let mut attempt = 1;

    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && is_transient(&e) => {
                let delay = backoff.next_delay();
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "attempt failed, retrying: {}",
                    e
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
