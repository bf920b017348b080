//! Live-channel configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-connection outbound queue capacity. A full queue drops the frame.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer_size: usize,
    /// Interval at which clients re-poll the unread count, in seconds.
    ///
    /// Advertised to clients; never negotiated per connection.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Whether connections without an accepted identity are kept
    /// for presence broadcasts.
    #[serde(default = "default_true")]
    pub allow_anonymous: bool,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_buffer_size: default_outbound_buffer(),
            poll_interval_seconds: default_poll_interval(),
            allow_anonymous: true,
        }
    }
}

fn default_outbound_buffer() -> usize {
    64
}

fn default_poll_interval() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
