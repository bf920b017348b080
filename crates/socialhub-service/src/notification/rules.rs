//! Rules deciding whether an event produces a notification at all.

use socialhub_core::types::UserId;
use socialhub_entity::NotificationKind;

/// Stateless notification rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationRules;

impl NotificationRules {
    /// Likes on one's own content never notify. Other kinds always do.
    pub fn should_notify(&self, sender: &UserId, recipient: &UserId, kind: NotificationKind) -> bool {
        !(kind.is_like() && sender == recipient)
    }
}
