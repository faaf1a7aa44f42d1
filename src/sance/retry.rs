use std::future::Future;
use std::time::Duration;

use super::resolver::Stage;
use crate::AcquireError;

/// Run `fut` until it settles or `timeout` elapses, whichever comes first.
///
/// On timeout the future is dropped, which cancels any in-flight request it owns.
pub async fn with_deadline<T, F>(timeout: Duration, fut: F) -> Result<T, AcquireError>
where
    F: Future<Output = Result<T, AcquireError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(AcquireError::Timeout(timeout)),
    }
}

/// Bounded retries with exponential backoff and a per-attempt deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
            attempt_timeout: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    /// Wait after the `failed`-th failed attempt: `base * 2^(failed - 1)`.
    pub fn delay_after(&self, failed: u32) -> Duration {
        let exponent = failed.saturating_sub(1).min(20);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Run `attempt` until it yields a value.
    ///
    /// `Ok(None)` (a miss), a timeout and retryable errors all count as a
    /// failed attempt. A non-retryable error is returned at once. After
    /// `max_attempts` failures the result is [`AcquireError::Exhausted`].
    pub async fn run<T, F, Fut>(
        &self,
        stage: Stage,
        label: &str,
        mut attempt: F,
    ) -> Result<T, AcquireError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, AcquireError>>,
    {
        for n in 1..=self.max_attempts {
            let reason = match with_deadline(self.attempt_timeout, attempt()).await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => "not found".to_string(),
                Err(e) if e.is_retryable() => e.to_string(),
                Err(e) => return Err(e),
            };

            if n == self.max_attempts {
                log::warn!("{label}: {stage} attempt {n}/{} failed ({reason})", self.max_attempts);
                break;
            }

            let delay = self.delay_after(n);
            log::warn!(
                "{label}: {stage} attempt {n}/{} failed ({reason}), retrying in {delay:?}",
                self.max_attempts
            );
            tokio::time::sleep(delay).await;
        }

        Err(AcquireError::Exhausted {
            stage,
            attempts: self.max_attempts,
        })
    }
}
