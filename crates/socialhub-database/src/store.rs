//! Store traits consumed by the notification and presence paths.

use async_trait::async_trait;

use socialhub_core::result::AppResult;
use socialhub_core::types::{NotificationId, UserId};
use socialhub_entity::{NewNotification, Notification, ProfileSummary};

/// Durable record of notifications.
///
/// Every mutation is scoped to a recipient: a caller can only read, mark
/// or delete notifications addressed to the user it names.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Persist a new notification and return the stored record.
    async fn create(&self, draft: NewNotification) -> AppResult<Notification>;

    /// Most recent notifications for a recipient, newest first.
    async fn list_recent(&self, recipient: &UserId, limit: u32) -> AppResult<Vec<Notification>>;

    /// Number of unread notifications for a recipient.
    async fn count_unread(&self, recipient: &UserId) -> AppResult<u64>;

    /// Find one notification by id.
    async fn find_by_id(&self, id: &NotificationId) -> AppResult<Option<Notification>>;

    /// Mark one notification read. Returns `true` only if it changed from
    /// unread to read; unknown, foreign and already-read ids return `false`.
    async fn mark_read(&self, id: &NotificationId, recipient: &UserId) -> AppResult<bool>;

    /// Mark every unread notification of a recipient read. Returns the
    /// number of records that changed.
    async fn mark_all_read(&self, recipient: &UserId) -> AppResult<u64>;

    /// Hard-delete every notification of a recipient. Returns the number
    /// of records removed.
    async fn clear_all(&self, recipient: &UserId) -> AppResult<u64>;
}

/// Read-only lookup of profile summaries by user id.
#[async_trait]
pub trait ProfileDirectory: Send + Sync + 'static {
    /// Fetch the current summary for a user, `None` if no such user exists.
    async fn find_summary(&self, user_id: &UserId) -> AppResult<Option<ProfileSummary>>;
}
