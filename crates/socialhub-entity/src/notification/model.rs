//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use socialhub_core::types::{NotificationId, UserId};

use super::{NotificationKind, TargetRef};
use crate::profile::ProfileSummary;

/// A persisted notification, denormalized for display.
///
/// The sender summary and target preview are copied in at creation time so
/// reads never have to join against profiles or content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The user this notification is addressed to.
    pub recipient_id: UserId,
    /// The user whose action produced it.
    pub sender_id: UserId,
    /// Sender profile as of creation.
    pub sender: ProfileSummary,
    /// Event type.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Content the event refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetRef>,
    /// Precomputed human-readable text.
    pub message: String,
    /// Whether the recipient has read it. Starts `false`.
    pub read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}

/// Everything needed to persist a new notification.
///
/// The store assigns nothing: `id` and `created_at` are fixed here so that
/// the record handed to the dispatcher is byte-for-byte the stored one.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub sender: ProfileSummary,
    pub kind: NotificationKind,
    pub target: Option<TargetRef>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl NewNotification {
    /// Materialize the record as it will be stored: unread, sender id taken
    /// from the summary.
    pub fn into_notification(self) -> Notification {
        Notification {
            id: self.id,
            recipient_id: self.recipient_id,
            sender_id: self.sender.user_id.clone(),
            sender: self.sender,
            kind: self.kind,
            target: self.target,
            message: self.message,
            read: false,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::TargetKind;

    fn draft() -> NewNotification {
        NewNotification {
            id: NotificationId::new(),
            recipient_id: UserId::parse("u1").unwrap(),
            sender: ProfileSummary::new(UserId::parse("u2").unwrap(), "Bob", "bob", None),
            kind: NotificationKind::PostLike,
            target: Some(TargetRef {
                kind: TargetKind::Post,
                id: "p1".to_string(),
                preview: Some("sunset".to_string()),
            }),
            message: "liked your post".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_notification_starts_unread() {
        let notification = draft().into_notification();
        assert!(notification.is_unread());
        assert_eq!(notification.sender_id.as_str(), "u2");
    }

    #[test]
    fn test_wire_form() {
        let notification = draft().into_notification();
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "post_like");
        assert_eq!(json["recipientId"], "u1");
        assert_eq!(json["senderId"], "u2");
        assert_eq!(json["sender"]["handle"], "bob");
        assert_eq!(json["target"]["kind"], "post");
        assert_eq!(json["target"]["preview"], "sunset");
        assert_eq!(json["read"], false);
        assert!(json.get("createdAt").is_some());
    }
}
