//! Exponential backoff for remote calls.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Bounded exponential backoff: attempt `n` (0-based) that fails waits
/// `base_delay * multiplier^n` before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_secs(1),
            multiplier: 2,
        }
    }
}

/// Something that can wait. Lets tests observe backoff without sleeping.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Real clock backed by tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(self.multiplier.saturating_pow(attempt))
    }

    /// Run `operation` until it succeeds or attempts run out.
    /// Exhaustion yields `None`, never an error.
    pub async fn run<S, F, Fut, T, E>(&self, sleeper: &S, mut operation: F) -> Option<T>
    where
        S: Sleeper,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        for attempt in 0..self.max_attempts {
            match operation().await {
                Ok(value) => return Some(value),
                Err(e) => {
                    if attempt + 1 < self.max_attempts {
                        let delay = self.delay_for(attempt);
                        warn!(
                            "Request failed: {}. Attempt {} of {}. Retrying in {:?}",
                            e,
                            attempt + 1,
                            self.max_attempts,
                            delay
                        );
                        sleeper.sleep(delay).await;
                    } else {
                        warn!(
                            "Request failed: {}. Giving up after {} attempts",
                            e, self.max_attempts
                        );
                    }
                }
            }
        }

        None
    }
}
