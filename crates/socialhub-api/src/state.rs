//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use socialhub_auth::JwtDecoder;
use socialhub_core::config::AppConfig;
use socialhub_database::DatabasePool;
use socialhub_realtime::RealtimeEngine;
use socialhub_service::NotificationService;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Live-channel engine.
    pub realtime: RealtimeEngine,
    /// Notification use cases.
    pub notification_service: Arc<NotificationService>,
    /// Bearer token validation.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// PostgreSQL pool, when that provider is configured.
    pub database: Option<DatabasePool>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Attach the pool so detailed health can probe it.
    pub fn with_database(mut self, pool: DatabasePool) -> Self {
        self.database = Some(pool);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("realtime", &self.realtime)
            .finish()
    }
}
