//! Notification dispatcher: pushes persisted notifications to online recipients.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use socialhub_entity::Notification;
use socialhub_service::NotificationPusher;

use crate::connection::handle::SendError;
use crate::connection::registry::ConnectionRegistry;
use crate::message::serializer;
use crate::message::types::OutboundMessage;
use crate::metrics::RealtimeMetrics;

/// What happened to one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Queued on the recipient's connection.
    Delivered,
    /// Recipient has no addressable connection.
    Offline,
    /// The connection refused the frame or it could not be encoded.
    Failed,
}

/// Best-effort push of notifications over the registry.
///
/// Only ever called with records that are already persisted; the client's
/// unread poll picks up anything this misses.
#[derive(Debug)]
pub struct NotificationDispatcher {
    registry: Arc<ConnectionRegistry>,
    metrics: Arc<RealtimeMetrics>,
}

impl NotificationDispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self { registry, metrics }
    }

    /// Push one notification to its recipient if they are connected.
    ///
    /// Never fails: every fault is logged and reported in the outcome.
    pub fn dispatch(&self, notification: &Notification) -> DispatchOutcome {
        let Some(handle) = self.registry.lookup(&notification.recipient_id) else {
            debug!(
                notification_id = %notification.id,
                recipient_id = %notification.recipient_id,
                "Recipient offline, skipping push"
            );
            self.metrics.notification_offline();
            return DispatchOutcome::Offline;
        };

        let frame = match serializer::encode(&OutboundMessage::NotificationNew(
            notification.clone(),
        )) {
            Ok(frame) => frame,
            Err(e) => {
                error!(notification_id = %notification.id, error = %e, "Failed to encode notification");
                self.metrics.notification_failed();
                return DispatchOutcome::Failed;
            }
        };

        match handle.send(frame) {
            Ok(()) => {
                debug!(
                    notification_id = %notification.id,
                    recipient_id = %notification.recipient_id,
                    conn_id = %handle.id,
                    "Notification pushed"
                );
                self.metrics.frame_sent();
                self.metrics.notification_delivered();
                DispatchOutcome::Delivered
            }
            Err(e) => {
                warn!(
                    notification_id = %notification.id,
                    recipient_id = %notification.recipient_id,
                    conn_id = %handle.id,
                    error = %e,
                    "Notification push failed"
                );
                self.metrics.frame_dropped();
                self.metrics.notification_failed();
                if e == SendError::Closed {
                    handle.mark_dead();
                }
                DispatchOutcome::Failed
            }
        }
    }
}

#[async_trait]
impl NotificationPusher for NotificationDispatcher {
    async fn push(&self, notification: &Notification) {
        self.dispatch(notification);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use socialhub_core::types::{NotificationId, UserId};
    use socialhub_entity::{NotificationKind, ProfileSummary};

    use super::*;
    use crate::connection::handle::ConnectionHandle;

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    fn notification_for(recipient: &str) -> Notification {
        Notification {
            id: NotificationId::new(),
            recipient_id: user(recipient),
            sender_id: user("u2"),
            sender: ProfileSummary::new(user("u2"), "Bob", "bob", None),
            kind: NotificationKind::ReelLike,
            target: None,
            message: "liked your reel".to_string(),
            read: false,
            created_at: Utc::now(),
        }
    }

    fn setup() -> (Arc<ConnectionRegistry>, Arc<RealtimeMetrics>, NotificationDispatcher) {
        let registry = Arc::new(ConnectionRegistry::new());
        let metrics = Arc::new(RealtimeMetrics::new());
        let dispatcher = NotificationDispatcher::new(registry.clone(), metrics.clone());
        (registry, metrics, dispatcher)
    }

    #[test]
    fn test_offline_recipient_is_silent() {
        let (registry, metrics, dispatcher) = setup();
        let (anon, mut rx) = ConnectionHandle::channel(4);
        registry.track_broadcast_only(Arc::new(anon));

        assert_eq!(dispatcher.dispatch(&notification_for("u1")), DispatchOutcome::Offline);
        assert!(rx.try_recv().is_err());
        assert_eq!(metrics.snapshot().notifications_offline, 1);
    }

    #[test]
    fn test_online_recipient_receives_payload() {
        let (registry, _, dispatcher) = setup();
        let (handle, mut rx) = ConnectionHandle::channel(4);
        registry.register(
            ProfileSummary::new(user("u1"), "Ada", "ada", None),
            Arc::new(handle),
        );

        let notification = notification_for("u1");
        assert_eq!(dispatcher.dispatch(&notification), DispatchOutcome::Delivered);

        let frame = rx.try_recv().unwrap();
        let parsed: OutboundMessage = serde_json::from_str(frame.as_str()).unwrap();
        assert_eq!(parsed, OutboundMessage::NotificationNew(notification));
    }

    #[test]
    fn test_superseded_connection_is_not_pushed() {
        let (registry, _, dispatcher) = setup();
        let (old, mut old_rx) = ConnectionHandle::channel(4);
        let (new, mut new_rx) = ConnectionHandle::channel(4);
        let summary = ProfileSummary::new(user("u1"), "Ada", "ada", None);
        registry.register(summary.clone(), Arc::new(old));
        registry.register(summary, Arc::new(new));

        dispatcher.dispatch(&notification_for("u1"));
        assert!(old_rx.try_recv().is_err());
        assert!(new_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_closed_connection_is_absorbed() {
        let (registry, metrics, dispatcher) = setup();
        let (handle, rx) = ConnectionHandle::channel(4);
        let handle = Arc::new(handle);
        registry.register(
            ProfileSummary::new(user("u1"), "Ada", "ada", None),
            handle.clone(),
        );
        drop(rx);

        dispatcher.push(&notification_for("u1")).await;
        assert!(!handle.is_alive());
        assert_eq!(metrics.snapshot().notifications_failed, 1);
    }
}
