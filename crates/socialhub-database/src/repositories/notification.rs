//! Notification store on PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_core::types::{NotificationId, UserId};
use socialhub_entity::{
    NewNotification, Notification, NotificationKind, ProfileSummary, TargetKind, TargetRef,
};

use crate::store::NotificationStore;

const SELECT_COLUMNS: &str = "id, recipient_id, sender_id, sender_display_name, sender_handle, \
     sender_avatar_url, kind, target_kind, target_id, target_preview, message, read, created_at";

/// Flat row shape of the `notifications` table.
#[derive(Debug, FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_id: String,
    sender_id: String,
    sender_display_name: String,
    sender_handle: String,
    sender_avatar_url: Option<String>,
    kind: String,
    target_kind: Option<String>,
    target_id: Option<String>,
    target_preview: Option<String>,
    message: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind = NotificationKind::parse(&row.kind).ok_or_else(|| {
            AppError::database(format!("Unknown notification kind '{}'", row.kind))
        })?;
        let target = match (row.target_kind, row.target_id) {
            (Some(kind), Some(id)) => Some(TargetRef {
                kind: TargetKind::parse(&kind)
                    .ok_or_else(|| AppError::database(format!("Unknown target kind '{kind}'")))?,
                id,
                preview: row.target_preview,
            }),
            _ => None,
        };
        let sender_id = UserId::parse(&row.sender_id)?;

        Ok(Notification {
            id: NotificationId::from_uuid(row.id),
            recipient_id: UserId::parse(&row.recipient_id)?,
            sender: ProfileSummary {
                user_id: sender_id.clone(),
                display_name: row.sender_display_name,
                handle: row.sender_handle,
                avatar_url: row.sender_avatar_url,
            },
            sender_id,
            kind,
            target,
            message: row.message,
            read: row.read,
            created_at: row.created_at,
        })
    }
}

/// [`NotificationStore`] backed by the `notifications` table.
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create(&self, draft: NewNotification) -> AppResult<Notification> {
        let notification = draft.into_notification();
        let target = notification.target.as_ref();

        sqlx::query(
            "INSERT INTO notifications (id, recipient_id, sender_id, sender_display_name, \
             sender_handle, sender_avatar_url, kind, target_kind, target_id, target_preview, \
             message, read, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(notification.id.into_uuid())
        .bind(notification.recipient_id.as_str())
        .bind(notification.sender_id.as_str())
        .bind(&notification.sender.display_name)
        .bind(&notification.sender.handle)
        .bind(notification.sender.avatar_url.as_deref())
        .bind(notification.kind.as_str())
        .bind(target.map(|t| t.kind.as_str()))
        .bind(target.map(|t| t.id.as_str()))
        .bind(target.and_then(|t| t.preview.as_deref()))
        .bind(&notification.message)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })?;

        Ok(notification)
    }

    async fn list_recent(&self, recipient: &UserId, limit: u32) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM notifications WHERE recipient_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2"
        ))
        .bind(recipient.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
        })?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn count_unread(&self, recipient: &UserId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND read = FALSE",
        )
        .bind(recipient.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))?;

        Ok(count.max(0) as u64)
    }

    async fn find_by_id(&self, id: &NotificationId) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find notification", e))?;

        row.map(Notification::try_from).transpose()
    }

    async fn mark_read(&self, id: &NotificationId, recipient: &UserId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE \
             WHERE id = $1 AND recipient_id = $2 AND read = FALSE",
        )
        .bind(id.into_uuid())
        .bind(recipient.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, recipient: &UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE recipient_id = $1 AND read = FALSE",
        )
        .bind(recipient.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;

        Ok(result.rows_affected())
    }

    async fn clear_all(&self, recipient: &UserId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient_id = $1")
            .bind(recipient.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear notifications", e)
            })?;

        Ok(result.rows_affected())
    }
}
