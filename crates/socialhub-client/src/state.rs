//! Local presence and notification state.
//!
//! Every transition is a small reducer so the live channel, the poller and
//! user actions all change state the same way.

use std::sync::Arc;

use tokio::sync::Mutex;

use socialhub_core::types::{NotificationId, UserId};
use socialhub_entity::{Notification, ProfileSummary};
use socialhub_realtime::message::OutboundMessage;

/// State shared between the subscriber, the poller and the UI.
pub type SharedState = Arc<Mutex<ClientState>>;

/// What a client knows about presence and its own notifications.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    online: Vec<ProfileSummary>,
    notifications: Vec<Notification>,
    unread: u64,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn online(&self) -> &[ProfileSummary] {
        &self.online
    }

    /// Notifications, newest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> u64 {
        self.unread
    }

    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.online.iter().any(|p| &p.user_id == user_id)
    }

    /// Apply one pushed frame.
    pub fn apply(&mut self, message: OutboundMessage) {
        match message {
            OutboundMessage::PresenceUpdate(online) => self.set_online(online),
            OutboundMessage::NotificationNew(notification) => {
                self.add_notification(notification)
            }
            OutboundMessage::Pong { .. } => {}
        }
    }

    /// Replace the online set. Presence frames are full snapshots.
    pub fn set_online(&mut self, online: Vec<ProfileSummary>) {
        self.online = online;
    }

    /// Prepend a pushed notification; only unread ones bump the counter.
    /// A notification already held (e.g. from a list reload) is ignored.
    pub fn add_notification(&mut self, notification: Notification) {
        if self.notifications.iter().any(|n| n.id == notification.id) {
            return;
        }
        if notification.is_unread() {
            self.unread += 1;
        }
        self.notifications.insert(0, notification);
    }

    /// Replace the list with a fresh `listRecent` result and recount unread
    /// from it.
    pub fn replace_notifications(&mut self, notifications: Vec<Notification>) {
        self.unread = notifications.iter().filter(|n| n.is_unread()).count() as u64;
        self.notifications = notifications;
    }

    /// Reconcile with the server's unread count.
    pub fn set_unread_count(&mut self, unread: u64) {
        self.unread = unread;
    }

    pub fn mark_read(&mut self, id: &NotificationId) {
        if let Some(n) = self.notifications.iter_mut().find(|n| &n.id == id) {
            if !n.read {
                n.read = true;
                self.unread = self.unread.saturating_sub(1);
            }
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.notifications {
            n.read = true;
        }
        self.unread = 0;
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
        self.unread = 0;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use socialhub_entity::{NewNotification, NotificationKind};

    use super::*;

    fn profile(id: &str) -> ProfileSummary {
        ProfileSummary::new(UserId::parse(id).unwrap(), id.to_uppercase(), id, None)
    }

    fn notification(read: bool) -> Notification {
        let mut n = NewNotification {
            id: NotificationId::new(),
            recipient_id: UserId::parse("u2").unwrap(),
            sender: profile("u1"),
            kind: NotificationKind::PostLike,
            target: None,
            message: "liked your post".into(),
            created_at: Utc::now(),
        }
        .into_notification();
        n.read = read;
        n
    }

    #[test]
    fn test_presence_update_replaces_online_set() {
        let mut state = ClientState::new();
        state.apply(OutboundMessage::PresenceUpdate(vec![profile("u1"), profile("u2")]));
        state.apply(OutboundMessage::PresenceUpdate(vec![profile("u2")]));

        assert_eq!(state.online().len(), 1);
        assert!(state.is_online(&UserId::parse("u2").unwrap()));
        assert!(!state.is_online(&UserId::parse("u1").unwrap()));
    }

    #[test]
    fn test_pushed_notification_is_prepended_and_counted() {
        let mut state = ClientState::new();
        let first = notification(false);
        let second = notification(false);
        state.apply(OutboundMessage::NotificationNew(first.clone()));
        state.apply(OutboundMessage::NotificationNew(second.clone()));
        state.apply(OutboundMessage::NotificationNew(notification(true)));

        assert_eq!(state.unread_count(), 2);
        assert_eq!(state.notifications().len(), 3);
        assert_eq!(state.notifications()[1].id, second.id);
        assert_eq!(state.notifications()[2].id, first.id);
    }

    #[test]
    fn test_duplicate_push_is_ignored() {
        let mut state = ClientState::new();
        let n = notification(false);
        state.add_notification(n.clone());
        state.add_notification(n);
        assert_eq!(state.unread_count(), 1);
        assert_eq!(state.notifications().len(), 1);
    }

    #[test]
    fn test_mark_read_never_goes_negative() {
        let mut state = ClientState::new();
        let n = notification(false);
        state.add_notification(n.clone());
        state.set_unread_count(0);

        state.mark_read(&n.id);
        state.mark_read(&n.id);
        assert_eq!(state.unread_count(), 0);
        assert!(state.notifications()[0].read);
    }

    #[test]
    fn test_mark_read_of_already_read_keeps_count() {
        let mut state = ClientState::new();
        let read = notification(true);
        state.add_notification(read.clone());
        state.add_notification(notification(false));

        state.mark_read(&read.id);
        assert_eq!(state.unread_count(), 1);
    }

    #[test]
    fn test_mark_all_and_clear() {
        let mut state = ClientState::new();
        state.add_notification(notification(false));
        state.add_notification(notification(false));

        state.mark_all_read();
        assert_eq!(state.unread_count(), 0);
        assert!(state.notifications().iter().all(|n| n.read));

        state.add_notification(notification(false));
        state.clear();
        assert_eq!(state.unread_count(), 0);
        assert!(state.notifications().is_empty());
    }

    #[test]
    fn test_reload_recounts_unread() {
        let mut state = ClientState::new();
        state.set_unread_count(7);
        state.replace_notifications(vec![
            notification(false),
            notification(true),
            notification(false),
        ]);
        assert_eq!(state.unread_count(), 2);
        assert_eq!(state.notifications().len(), 3);

        state.replace_notifications(Vec::new());
        assert_eq!(state.unread_count(), 0);
    }

    #[test]
    fn test_poll_reconciles_missed_push() {
        let mut state = ClientState::new();
        state.set_unread_count(3);
        assert_eq!(state.unread_count(), 3);
    }
}
