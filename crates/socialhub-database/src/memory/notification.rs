//! In-memory notification store.

use std::cmp::Reverse;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::types::{NotificationId, UserId};
use socialhub_entity::{NewNotification, Notification};

use crate::store::NotificationStore;

/// [`NotificationStore`] over a concurrent map keyed by notification id.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    records: DashMap<NotificationId, Notification>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records across all recipients.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, draft: NewNotification) -> AppResult<Notification> {
        let notification = draft.into_notification();
        match self.records.entry(notification.id) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Notification {} already exists",
                notification.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(notification.clone());
                Ok(notification)
            }
        }
    }

    async fn list_recent(&self, recipient: &UserId, limit: u32) -> AppResult<Vec<Notification>> {
        let mut matching: Vec<Notification> = self
            .records
            .iter()
            .filter(|entry| &entry.recipient_id == recipient)
            .map(|entry| entry.value().clone())
            .collect();
        matching.sort_by_key(|n| Reverse((n.created_at, *n.id.as_uuid())));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn count_unread(&self, recipient: &UserId) -> AppResult<u64> {
        Ok(self
            .records
            .iter()
            .filter(|entry| &entry.recipient_id == recipient && !entry.read)
            .count() as u64)
    }

    async fn find_by_id(&self, id: &NotificationId) -> AppResult<Option<Notification>> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn mark_read(&self, id: &NotificationId, recipient: &UserId) -> AppResult<bool> {
        match self.records.get_mut(id) {
            Some(mut entry) if &entry.recipient_id == recipient && !entry.read => {
                entry.read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_read(&self, recipient: &UserId) -> AppResult<u64> {
        let mut changed = 0;
        for mut entry in self.records.iter_mut() {
            if &entry.recipient_id == recipient && !entry.read {
                entry.read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn clear_all(&self, recipient: &UserId) -> AppResult<u64> {
        let before = self.records.len();
        self.records.retain(|_, n| &n.recipient_id != recipient);
        Ok(before.saturating_sub(self.records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use socialhub_entity::{NotificationKind, ProfileSummary};

    use super::*;

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    fn draft(recipient: &str, sender: &str, minutes_ago: i64) -> NewNotification {
        NewNotification {
            id: NotificationId::new(),
            recipient_id: user(recipient),
            sender: ProfileSummary::new(user(sender), sender.to_uppercase(), sender, None),
            kind: NotificationKind::PostLike,
            target: None,
            message: "liked your post".to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_list_recent_is_newest_first_and_bounded() {
        let store = MemoryNotificationStore::new();
        let old = store.create(draft("u1", "u2", 30)).await.unwrap();
        let newest = store.create(draft("u1", "u3", 1)).await.unwrap();
        let middle = store.create(draft("u1", "u4", 10)).await.unwrap();
        store.create(draft("u9", "u2", 0)).await.unwrap();

        let all = store.list_recent(&user("u1"), 20).await.unwrap();
        let ids: Vec<_> = all.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![newest.id, middle.id, old.id]);

        let bounded = store.list_recent(&user("u1"), 2).await.unwrap();
        assert_eq!(bounded.len(), 2);
        assert_eq!(bounded[0].id, newest.id);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent_and_scoped() {
        let store = MemoryNotificationStore::new();
        let n = store.create(draft("u1", "u2", 0)).await.unwrap();

        assert!(!store.mark_read(&n.id, &user("u2")).await.unwrap());
        assert_eq!(store.count_unread(&user("u1")).await.unwrap(), 1);

        assert!(store.mark_read(&n.id, &user("u1")).await.unwrap());
        assert!(!store.mark_read(&n.id, &user("u1")).await.unwrap());
        assert_eq!(store.count_unread(&user("u1")).await.unwrap(), 0);

        let missing = NotificationId::new();
        assert!(!store.mark_read(&missing, &user("u1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_all_read_then_unread_is_zero() {
        let store = MemoryNotificationStore::new();
        for i in 0..3 {
            store.create(draft("u1", "u2", i)).await.unwrap();
        }
        store.create(draft("u5", "u2", 0)).await.unwrap();

        assert_eq!(store.mark_all_read(&user("u1")).await.unwrap(), 3);
        assert_eq!(store.mark_all_read(&user("u1")).await.unwrap(), 0);
        assert_eq!(store.count_unread(&user("u1")).await.unwrap(), 0);
        assert_eq!(store.count_unread(&user("u5")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_all_only_touches_recipient() {
        let store = MemoryNotificationStore::new();
        let gone = store.create(draft("u1", "u2", 0)).await.unwrap();
        store.create(draft("u1", "u3", 0)).await.unwrap();
        store.create(draft("u2", "u1", 0)).await.unwrap();

        assert_eq!(store.clear_all(&user("u1")).await.unwrap(), 2);
        assert_eq!(store.clear_all(&user("u1")).await.unwrap(), 0);
        assert!(store.find_by_id(&gone.id).await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }
}
