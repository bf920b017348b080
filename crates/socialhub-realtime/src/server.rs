//! Top-level live-channel engine that ties the subsystems together.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use socialhub_core::config::RealtimeConfig;
use socialhub_database::ProfileDirectory;

use crate::connection::manager::ConnectionManager;
use crate::connection::registry::ConnectionRegistry;
use crate::metrics::RealtimeMetrics;
use crate::notification::dispatcher::NotificationDispatcher;
use crate::presence::broadcaster::PresenceBroadcaster;

/// Central engine shared by the WebSocket handler and the notification
/// service.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Connection lifecycle.
    pub connections: Arc<ConnectionManager>,
    /// Presence fan-out.
    pub presence: Arc<PresenceBroadcaster>,
    /// Notification push.
    pub notifications: Arc<NotificationDispatcher>,
    /// Counters.
    pub metrics: Arc<RealtimeMetrics>,
    /// Client poll interval advertised by the server.
    pub poll_interval_seconds: u64,
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("online", &self.registry.online_count())
            .field("connections", &self.registry.connection_count())
            .finish()
    }
}

impl RealtimeEngine {
    pub fn new(config: RealtimeConfig, profiles: Arc<dyn ProfileDirectory>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(RealtimeMetrics::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let presence = Arc::new(PresenceBroadcaster::new(registry.clone(), metrics.clone()));
        let notifications = Arc::new(NotificationDispatcher::new(
            registry.clone(),
            metrics.clone(),
        ));
        let poll_interval_seconds = config.poll_interval_seconds;
        let connections = Arc::new(ConnectionManager::new(
            config,
            registry.clone(),
            presence.clone(),
            profiles,
            metrics.clone(),
        ));

        info!("Real-time engine initialized");

        Self {
            registry,
            connections,
            presence,
            notifications,
            metrics,
            poll_interval_seconds,
            shutdown_tx,
        }
    }

    /// Receiver that fires once when the engine shuts down.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal every connection task to stop and empty the registry.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");
        let _ = self.shutdown_tx.send(());
        self.connections.close_all();
    }
}
