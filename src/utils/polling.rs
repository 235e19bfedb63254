/// Polling loop for waiting on cluster conditions with a timeout
use anyhow::Result;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::info;

/// Timeout and interval settings for one polling loop
pub struct PollingConfig {
    pub timeout: Duration,
    pub interval: Duration,
    pub description: String,
}

impl PollingConfig {
    /// Create a new polling configuration
    pub fn new(timeout_secs: u64, interval_secs: u64, description: impl Into<String>) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            interval: Duration::from_secs(interval_secs),
            description: description.into(),
        }
    }

    /// Poll until the condition returns Ok(true) or the timeout elapses.
    ///
    /// Ok(false) keeps polling; an Err from the condition stops the loop and
    /// propagates.
    pub async fn poll_until<F, Fut>(&self, condition: F) -> Result<()>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        info!("{}...", self.description);

        let start = Instant::now();

        loop {
            if condition().await? {
                info!("✓ {}", self.description);
                return Ok(());
            }

            if start.elapsed() > self.timeout {
                anyhow::bail!(
                    "Timeout after {} seconds: {}",
                    self.timeout.as_secs(),
                    self.description
                );
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_poll_until_success() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let config = PollingConfig::new(10, 1, "test polling");

        let result = config
            .poll_until(|| {
                let c = counter_clone.clone();
                async move {
                    let val = c.fetch_add(1, Ordering::SeqCst);
                    Ok(val >= 2)
                }
            })
            .await;

        assert!(result.is_ok());
        assert!(counter.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_poll_until_timeout() {
        let config = PollingConfig::new(1, 1, "test timeout");

        let result = config.poll_until(|| async { Ok(false) }).await;

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Timeout"));
    }

    #[tokio::test]
    async fn test_poll_until_propagates_error() {
        let config = PollingConfig::new(5, 1, "test error");

        let result = config
            .poll_until(|| async { anyhow::bail!("condition failed") })
            .await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("condition failed"));
    }
}
