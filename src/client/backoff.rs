//! Capped exponential backoff
//!
//! Only the component data upload retries; every other call is single-shot.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::error::Result;

/// First wait between attempts
pub const INITIAL_WAIT: Duration = Duration::from_secs(2);

/// Waits stop doubling before they reach this ceiling
pub const WAIT_CEILING: Duration = Duration::from_secs(60);

/// Something that can wait between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Waits on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry policy: one attempt, then one retry after each wait of
/// `initial, 2*initial, 4*initial, ...` below `ceiling`.
///
/// With the defaults the waits are 2s, 4s, 8s, 16s and 32s: six attempts in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    initial: Duration,
    ceiling: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial: INITIAL_WAIT,
            ceiling: WAIT_CEILING,
        }
    }
}

impl ExponentialBackoff {
    /// Custom schedule; `initial` is raised to one millisecond if zero
    pub fn new(initial: Duration, ceiling: Duration) -> Self {
        Self {
            initial: initial.max(Duration::from_millis(1)),
            ceiling,
        }
    }

    /// The waits taken between attempts, in order
    pub fn waits(&self) -> impl Iterator<Item = Duration> {
        let ceiling = self.ceiling;
        std::iter::successors(Some(self.initial), |wait| wait.checked_mul(2))
            .take_while(move |wait| *wait < ceiling)
    }

    /// Total number of attempts this policy makes before giving up
    pub fn max_attempts(&self) -> usize {
        self.waits().count() + 1
    }

    /// Run `operation` until it succeeds or the schedule is exhausted.
    ///
    /// The error of the last attempt is returned.
    pub async fn retry<T, F, Fut>(&self, sleeper: &dyn Sleeper, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut result = operation().await;
        for wait in self.waits() {
            match result {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!("operation failed, retrying in {:?}: {}", wait, err);
                    sleeper.sleep(wait).await;
                    result = operation().await;
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, Error};
    use std::sync::Mutex;

    /// Records the requested waits instead of sleeping
    #[derive(Default)]
    struct RecordingSleeper {
        waits: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }

    fn failure(attempt: usize) -> Error {
        ApiError::InvalidResponse(format!("attempt {}", attempt)).into()
    }

    #[test]
    fn test_default_schedule() {
        let waits: Vec<u64> = ExponentialBackoff::default()
            .waits()
            .map(|wait| wait.as_secs())
            .collect();
        assert_eq!(waits, vec![2, 4, 8, 16, 32]);
        assert_eq!(ExponentialBackoff::default().max_attempts(), 6);
    }

    #[test]
    fn test_zero_initial_wait_terminates() {
        let backoff = ExponentialBackoff::new(Duration::ZERO, Duration::from_millis(10));
        assert_eq!(backoff.max_attempts(), 5);
    }

    #[tokio::test]
    async fn test_succeeds_after_two_failures() {
        let sleeper = RecordingSleeper::default();
        let mut attempts = 0;

        let result = ExponentialBackoff::default()
            .retry(&sleeper, || {
                attempts += 1;
                let attempt = attempts;
                async move {
                    if attempt < 3 {
                        Err(failure(attempt))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(
            *sleeper.waits.lock().unwrap(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test]
    async fn test_first_success_never_waits() {
        let sleeper = RecordingSleeper::default();
        let result = ExponentialBackoff::default()
            .retry(&sleeper, || async { Ok::<_, Error>("done") })
            .await;
        assert_eq!(result.unwrap(), "done");
        assert!(sleeper.waits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gives_up_with_last_error() {
        let sleeper = RecordingSleeper::default();
        let mut attempts = 0;

        let err = ExponentialBackoff::default()
            .retry(&sleeper, || {
                attempts += 1;
                let attempt = attempts;
                async move { Err::<(), _>(failure(attempt)) }
            })
            .await
            .unwrap_err();

        assert_eq!(attempts, 6);
        assert!(err.to_string().contains("attempt 6"));
        let total: Duration = sleeper.waits.lock().unwrap().iter().sum();
        assert_eq!(total, Duration::from_secs(62));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_waits() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(4)).await;
        assert!(start.elapsed() >= Duration::from_secs(4));
    }
}
