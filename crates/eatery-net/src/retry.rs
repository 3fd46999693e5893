//! Bounded retry with invalidation between attempts.

use std::fmt;
use std::future::Future;

/// How many extra attempts a failing operation gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retry_budget: u32,
}

impl RetryPolicy {
    pub const fn new(retry_budget: u32) -> Self {
        Self { retry_budget }
    }

    /// Total attempts, including the first.
    pub const fn max_attempts(self) -> u32 {
        self.retry_budget.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { retry_budget: 1 }
    }
}

/// Runs `op`, calling `invalidate` and trying again after each failure until
/// the policy's attempts are used up. Returns the last error.
pub async fn with_retry<T, E, Op, Fut, Inv>(
    policy: RetryPolicy,
    mut invalidate: Inv,
    mut op: Op,
) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Inv: FnMut(),
    E: fmt::Display,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts() => {
                tracing::warn!(attempt, error = %err, "attempt failed, invalidating and retrying");
                invalidate();
                attempt += 1;
            }
            Err(err) => {
                if attempt > 1 {
                    tracing::warn!(attempts = attempt, error = %err, "retry budget exhausted");
                }
                return Err(err);
            }
        }
    }
}
