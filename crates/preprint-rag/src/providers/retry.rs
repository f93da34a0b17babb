//! Bounded retry with exponential backoff for external calls

use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// A failed attempt, tagged with whether trying again can help
#[derive(Debug)]
pub enum Attempt {
    /// Connection failures, 5xx and 429 responses
    Transient(Error),
    /// Everything else; returned without retrying
    Permanent(Error),
}

impl Attempt {
    /// Classify an error response by its HTTP status
    pub fn from_status(status: StatusCode, error: Error) -> Self {
        if is_retryable_status(status) {
            Self::Transient(error)
        } else {
            Self::Permanent(error)
        }
    }

    pub fn into_error(self) -> Error {
        match self {
            Self::Transient(e) | Self::Permanent(e) => e,
        }
    }
}

/// Server errors and rate limiting are worth retrying
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Retry policy: `max_retries` extra attempts, delay doubling from `base_delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_base_delay_ms),
        )
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }

    /// Run `operation` until it succeeds, fails permanently, or the attempts
    /// are used up. The error from the final attempt is returned.
    pub async fn run<F, Fut, T>(&self, what: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, Attempt>>,
    {
        let mut attempt = 0u32;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(Attempt::Transient(e)) if attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        what,
                        attempt + 1,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.into_error()),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(500))
    }
}
