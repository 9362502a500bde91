use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::Result;
use crate::ui::log_verbose;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never less than 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Run `operation`, retrying retryable errors with exponential backoff.
    pub async fn run<F, Fut, T>(&self, verbose: bool, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut delay = self.base_delay.min(self.max_delay);
        let mut attempts = 0;

        loop {
            attempts += 1;

            match operation().await {
                Ok(value) => {
                    if attempts > 1 {
                        log_verbose(
                            verbose,
                            "fncall",
                            &format!("Request succeeded after {} attempts", attempts),
                        );
                    }
                    return Ok(value);
                }
                Err(e) if !e.is_retryable() || attempts >= max_attempts => return Err(e),
                Err(e) => {
                    log_verbose(
                        verbose,
                        "fncall",
                        &format!(
                            "Attempt {}/{} failed, retrying in {:?}: {}",
                            attempts, max_attempts, delay, e
                        ),
                    );
                    sleep(delay).await;
                    delay = (delay * 2).min(self.max_delay);
                }
            }
        }
    }
}
