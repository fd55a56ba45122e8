//! Bounded retry for network operations.
//!
//! A [`RetryPolicy`] runs an operation up to `max_attempts` times and folds
//! the failures into one [`NetworkError::RetriesExhausted`]. Attempts follow
//! each other immediately unless a backoff base delay is configured, in which
//! case the wait before retry `n` (0-indexed) is `base * 2^n`.

use crate::transfer::NetworkError;
use log::debug;
use std::time::Duration;

/// Attempts made when no explicit limit is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// How many times, and how patiently, to retry a network operation.
///
/// # Examples
///
/// ```
/// use modpack_mirror::retry::RetryPolicy;
/// use modpack_mirror::transfer::NetworkError;
///
/// let policy = RetryPolicy::new(3);
/// let mut calls = 0;
/// let result: Result<u32, NetworkError> = policy.run("count calls", || {
///     calls += 1;
///     Ok(calls)
/// });
/// assert_eq!(result, Ok(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
}

impl RetryPolicy {
    /// Create a policy with `max_attempts` attempts and no delay.
    ///
    /// A limit of zero is raised to one: the operation always runs at least
    /// once.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base: Duration::ZERO,
        }
    }

    /// Wait `base * 2^n` before retry `n`.
    #[must_use]
    pub fn with_backoff(self, base: Duration) -> Self {
        Self {
            backoff_base: base,
            ..self
        }
    }

    /// Return the attempt limit.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Return the delay that precedes retry `retry_index` (0-indexed).
    #[must_use]
    pub fn delay_before_retry(&self, retry_index: u32) -> Duration {
        let multiplier = 2_u32.saturating_pow(retry_index);
        self.backoff_base.saturating_mul(multiplier)
    }

    /// Run `attempt` until it succeeds or the attempt limit is reached.
    ///
    /// `operation` describes the work in the aggregated error.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::RetriesExhausted`] carrying the final failure
    /// when every attempt fails.
    pub fn run<T, F>(&self, operation: &str, mut attempt: F) -> Result<T, NetworkError>
    where
        F: FnMut() -> Result<T, NetworkError>,
    {
        let mut last = match attempt() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        for retry_index in 0..self.max_attempts.saturating_sub(1) {
            debug!("{operation}: attempt {} failed: {last}", retry_index + 1);
            let delay = self.delay_before_retry(retry_index);
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            last = match attempt() {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
        }

        Err(NetworkError::RetriesExhausted {
            operation: operation.to_owned(),
            attempts: self.max_attempts,
            last: Box::new(last),
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}
