//! Pacing between external calls
//!
//! The free reference services share an unstated per-IP rate limit, so every
//! external call is followed by a fixed delay.

use std::time::Duration;

use async_trait::async_trait;

use super::cancellation::CancellationToken;

#[async_trait]
pub trait RateGovernor: Send + Sync {
    /// Wait before the next external call may start.
    ///
    /// Returns early when the request is cancelled.
    async fn pace(&self, cancel: &CancellationToken);
}

/// Sleeps a fixed delay after each external call
#[derive(Debug, Clone)]
pub struct FixedDelayGovernor {
    delay: Duration,
}

impl FixedDelayGovernor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RateGovernor for FixedDelayGovernor {
    async fn pace(&self, cancel: &CancellationToken) {
        tokio::select! {
            _ = tokio::time::sleep(self.delay) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Pacing interrupted by cancellation");
            }
        }
    }
}
