use std::future::Future;
use std::time::Duration;

use album_logging::{album_debug, album_warn};

use crate::FetchError;

/// Attempt cap plus exponential backoff: the wait after failed attempt `n`
/// (0-based) is `unit * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, unit: Duration) -> Self {
        Self { max_attempts, unit }
    }

    /// Listing calls: 3 attempts, waits of 1s then 2s.
    pub fn listing() -> Self {
        Self::new(3, Duration::from_secs(1))
    }

    /// Article page fetches: 2 attempts, one wait of 2s.
    pub fn content() -> Self {
        Self::new(2, Duration::from_secs(2))
    }

    pub fn with_max_attempts(self, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..self
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.unit.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Every wait a fully failing call goes through, in order.
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.attempts().saturating_sub(1))
            .map(|attempt| self.delay_for(attempt))
            .collect()
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the policy's
/// attempts are used up. The last error is returned; there is no wait after it.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    label: &str,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let attempts = policy.attempts();
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    album_debug!("{label} succeeded after {} attempts", attempt + 1);
                }
                return Ok(value);
            }
            Err(err) => {
                if attempt + 1 >= attempts || !err.is_retryable() {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                album_warn!(
                    "{label} failed (attempt {}/{attempts}): {err}; retrying in {delay:?}",
                    attempt + 1
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
