//! Response DTOs.

use serde::{Deserialize, Serialize};

use socialhub_entity::ProfileSummary;
use socialhub_realtime::metrics::MetricsSnapshot;

/// Envelope for non-list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `GET /api/notifications/unread-count`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

/// Result of a read-state mutation. `affected` is zero for no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub affected: u64,
}

impl MutationResponse {
    pub fn new(affected: u64) -> Self {
        Self {
            success: true,
            affected,
        }
    }
}

/// `GET /api/presence/online`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersResponse {
    pub online_users: Vec<ProfileSummary>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    pub status: String,
    /// `memory`, `connected` or `unreachable`.
    pub database: String,
    pub online_users: usize,
    pub live_connections: usize,
    /// Interval clients poll the unread count at.
    pub poll_interval_seconds: u64,
    pub realtime: MetricsSnapshot,
}
