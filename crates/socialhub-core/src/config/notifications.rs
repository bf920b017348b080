//! Notification creation and query configuration.

use serde::{Deserialize, Serialize};

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Default number of records returned by the recent list.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
    /// Upper bound on a caller-supplied `limit`.
    #[serde(default = "default_max_recent_limit")]
    pub max_recent_limit: u32,
    /// Timeout applied to each store call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
    /// Characters of target content kept in the denormalized preview.
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            max_recent_limit: default_max_recent_limit(),
            store_timeout_ms: default_store_timeout(),
            preview_length: default_preview_length(),
        }
    }
}

fn default_recent_limit() -> u32 {
    20
}

fn default_max_recent_limit() -> u32 {
    100
}

fn default_store_timeout() -> u64 {
    5000
}

fn default_preview_length() -> usize {
    30
}
