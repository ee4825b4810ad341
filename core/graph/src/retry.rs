//! Fixed-delay retry for transient failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

use cirrus_common::Result;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds.
    pub delay_ms: u64,
}

impl RetryConfig {
    /// Create a new retry configuration with the default delay.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Set the total number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = delay.as_millis() as u64;
        self
    }

    /// Delay between attempts.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay_ms: 1000,
        }
    }
}

/// Waits out the delay between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry executor for running operations with retry logic.
pub struct RetryExecutor<'a> {
    config: &'a RetryConfig,
    sleeper: &'a dyn Sleeper,
}

impl<'a> RetryExecutor<'a> {
    /// Create a new retry executor.
    pub fn new(config: &'a RetryConfig, sleeper: &'a dyn Sleeper) -> Self {
        Self { config, sleeper }
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    ///
    /// The operation receives the 1-based attempt number. When every attempt
    /// fails, the error of the last attempt is returned.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(attempt, "Operation succeeded after retry");
                    }
                    return Ok(result);
                }
                Err(err) if attempt >= max_attempts => {
                    error!(error = %err, attempts = attempt, "Operation failed after retry");
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.config.delay();
                    warn!(
                        error = %err,
                        attempt,
                        ?delay,
                        "Operation failed, retrying after delay"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use cirrus_common::Error;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Records requested delays without waiting.
    #[derive(Default)]
    pub(crate) struct RecordingSleeper {
        pub(crate) delays: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.delay(), Duration::from_secs(1));

        let config = RetryConfig::new(5).with_delay(Duration::from_millis(250));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.delay_ms, 250);
    }

    #[tokio::test]
    async fn test_successful_operation() {
        let config = RetryConfig::default();
        let sleeper = RecordingSleeper::default();
        let executor = RetryExecutor::new(&config, &sleeper);

        let result: Result<i32> = executor.execute(|_| async { Ok(42) }).await;

        assert_eq!(result.unwrap(), 42);
        assert!(sleeper.delays.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let config = RetryConfig::default();
        let sleeper = RecordingSleeper::default();
        let executor = RetryExecutor::new(&config, &sleeper);
        let calls = AtomicU32::new(0);

        let result: Result<u32> = executor
            .execute(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 1 {
                        Err(Error::Network("Connection reset".to_string()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*sleeper.delays.lock().unwrap(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn test_last_error_is_returned() {
        let config = RetryConfig::new(3).with_delay(Duration::from_millis(5));
        let sleeper = RecordingSleeper::default();
        let executor = RetryExecutor::new(&config, &sleeper);

        let result: Result<()> = executor
            .execute(|attempt| async move { Err(Error::Network(format!("attempt {}", attempt))) })
            .await;

        match result {
            Err(Error::Network(msg)) => assert_eq!(msg, "attempt 3"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(sleeper.delays.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let config = RetryConfig::new(0);
        let sleeper = RecordingSleeper::default();
        let executor = RetryExecutor::new(&config, &sleeper);

        let result: Result<()> = executor
            .execute(|_| async { Err(Error::NotFound("gone".to_string())) })
            .await;

        assert!(result.is_err());
        assert!(sleeper.delays.lock().unwrap().is_empty());
    }
}
