//! Unread-count poll fallback.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::api::RestClient;
use crate::error::ClientResult;
use crate::state::SharedState;

/// Default client poll period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Re-reads the unread count on a fixed interval, whether or not any push
/// arrived, and overwrites the local counter with it.
#[derive(Debug, Clone)]
pub struct UnreadPoller {
    client: RestClient,
    state: SharedState,
    interval: Duration,
}

impl UnreadPoller {
    pub fn new(client: RestClient, state: SharedState) -> Self {
        Self::with_interval(client, state, DEFAULT_POLL_INTERVAL)
    }

    /// `interval` is raised to at least one millisecond.
    pub fn with_interval(client: RestClient, state: SharedState, interval: Duration) -> Self {
        Self {
            client,
            state,
            interval: interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One reconciliation round.
    pub async fn poll_once(&self) -> ClientResult<u64> {
        let unread = self.client.unread_count().await?;
        self.state.lock().await.set_unread_count(unread);
        debug!(unread, "Unread count reconciled");
        Ok(unread)
    }

    /// Poll forever on a background task; the first round runs immediately.
    /// Failed rounds are logged and retried on the next tick.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.poll_once().await {
                    warn!(error = %e, "Unread count poll failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ClientState;

    fn client() -> RestClient {
        RestClient::new("http://localhost:8000", "t").unwrap()
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let poller = UnreadPoller::with_interval(client(), ClientState::shared(), Duration::ZERO);
        assert_eq!(poller.interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_default_interval() {
        let poller = UnreadPoller::new(client(), ClientState::shared());
        assert_eq!(poller.interval(), DEFAULT_POLL_INTERVAL);
    }
}
