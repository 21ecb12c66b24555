//! Exponential backoff for rate-limited requests
//!
//! Only HTTP 429 is retried. The delay before retry `n` (zero based) is
//! `base_delay * 2^n`, so the default policy waits 1s, 2s, 4s, 8s and 16s
//! before giving up after the fifth retry.

use crate::error::ClientResult;
use futures::future::BoxFuture;
use offer_admin_core::config::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Boxed sleep future used by [`retry_rate_limited`]
pub type SleepFuture = BoxFuture<'static, ()>;

/// Retry policy for rate-limited calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay to wait before retry number `retry_count`
    pub fn delay_for(&self, retry_count: u32) -> Duration {
        let factor = 2_u32.checked_pow(retry_count).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Whether a failed attempt at `retry_count` should be retried
    pub fn should_retry(&self, rate_limited: bool, retry_count: u32) -> bool {
        rate_limited && retry_count < self.max_retries
    }

    /// Every delay this policy can produce, in order
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.max_retries).map(|n| self.delay_for(n)).collect()
    }
}

/// Sleep on the tokio timer
pub fn tokio_sleep(delay: Duration) -> SleepFuture {
    Box::pin(tokio::time::sleep(delay))
}

/// Run `op` until it succeeds, fails with something other than a rate limit,
/// or the policy runs out of retries
///
/// `op` receives the current retry count. `sleep` is awaited between attempts.
///
/// # Errors
///
/// Returns the last error from `op`.
pub async fn retry_rate_limited<T, Op, Fut, Sleep>(
    policy: RetryPolicy,
    mut op: Op,
    mut sleep: Sleep,
) -> ClientResult<T>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = ClientResult<T>>,
    Sleep: FnMut(Duration) -> SleepFuture,
{
    let mut retry_count = 0;
    loop {
        match op(retry_count).await {
            Ok(value) => return Ok(value),
            Err(err) if policy.should_retry(err.is_rate_limited(), retry_count) => {
                let delay = policy.delay_for(retry_count);
                info!(
                    retry = retry_count + 1,
                    max_retries = policy.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Rate limited, retrying"
                );
                sleep(delay).await;
                retry_count += 1;
            }
            Err(err) => {
                if err.is_rate_limited() {
                    warn!(retries = retry_count, "Giving up after repeated rate limiting");
                }
                return Err(err);
            }
        }
    }
}
