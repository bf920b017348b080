//! Seam between the write path and live delivery.

use async_trait::async_trait;

use socialhub_entity::Notification;

/// Best-effort delivery of an already persisted notification.
///
/// Implementations absorb their own failures: `push` has no error channel
/// because the record is durable and clients recover it by polling.
#[async_trait]
pub trait NotificationPusher: Send + Sync + 'static {
    async fn push(&self, notification: &Notification);
}

/// Pusher that delivers nothing. Used when no live channel is running.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPusher;

#[async_trait]
impl NotificationPusher for NoopPusher {
    async fn push(&self, _notification: &Notification) {}
}
