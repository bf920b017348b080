//! Notification write path and poll-fallback queries.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use socialhub_core::config::NotificationsConfig;
use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::types::{NotificationId, UserId};
use socialhub_database::{NotificationStore, ProfileDirectory};
use socialhub_entity::{NewNotification, Notification, NotificationKind, TargetKind, TargetRef};

use super::formatter;
use super::pusher::NotificationPusher;
use super::rules::NotificationRules;
use crate::context::RequestContext;

/// What the CRUD layer reports after a like or message action.
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub recipient_id: UserId,
    pub kind: NotificationKind,
    pub target: Option<TargetDraft>,
}

/// The content an action touched, with its full text for previewing.
#[derive(Debug, Clone)]
pub struct TargetDraft {
    pub kind: TargetKind,
    pub id: String,
    pub content: Option<String>,
}

/// Creates notifications and serves the recipient-scoped read path.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    profiles: Arc<dyn ProfileDirectory>,
    pusher: Arc<dyn NotificationPusher>,
    rules: NotificationRules,
    config: NotificationsConfig,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("config", &self.config)
            .finish()
    }
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        profiles: Arc<dyn ProfileDirectory>,
        pusher: Arc<dyn NotificationPusher>,
        config: NotificationsConfig,
    ) -> Self {
        Self {
            store,
            profiles,
            pusher,
            rules: NotificationRules,
            config,
        }
    }

    /// Record a notification from the acting user and push it if possible.
    ///
    /// Returns `Ok(None)` when the rules suppress it (self-likes). The record
    /// is persisted before the pusher sees it; if persistence fails or times
    /// out the error is returned and nothing is pushed.
    pub async fn notify(
        &self,
        ctx: &RequestContext,
        draft: NotificationDraft,
    ) -> AppResult<Option<Notification>> {
        if !self
            .rules
            .should_notify(&ctx.user_id, &draft.recipient_id, draft.kind)
        {
            debug!(
                user_id = %ctx.user_id,
                kind = %draft.kind,
                "Skipping self-addressed notification"
            );
            return Ok(None);
        }

        let sender = self
            .bounded("find sender profile", self.profiles.find_summary(&ctx.user_id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", ctx.user_id)))?;

        let new = NewNotification {
            id: NotificationId::new(),
            recipient_id: draft.recipient_id,
            sender,
            kind: draft.kind,
            target: draft.target.map(|t| TargetRef {
                kind: t.kind,
                id: t.id,
                preview: t
                    .content
                    .as_deref()
                    .map(|c| formatter::preview(c, self.config.preview_length))
                    .filter(|p| !p.is_empty()),
            }),
            message: formatter::message_text(draft.kind).to_string(),
            created_at: Utc::now(),
        };

        let notification = self
            .bounded("create notification", self.store.create(new))
            .await?;

        info!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            sender_id = %notification.sender_id,
            kind = %notification.kind,
            "Notification created"
        );

        self.pusher.push(&notification).await;

        Ok(Some(notification))
    }

    /// Newest-first notifications of the caller. `None` uses the configured
    /// default; larger values are capped.
    pub async fn list_recent(
        &self,
        ctx: &RequestContext,
        limit: Option<u32>,
    ) -> AppResult<Vec<Notification>> {
        let limit = self.effective_limit(limit);
        self.bounded(
            "list notifications",
            self.store.list_recent(&ctx.user_id, limit),
        )
        .await
    }

    /// Number of unread notifications of the caller.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.bounded("count unread", self.store.count_unread(&ctx.user_id))
            .await
    }

    /// Mark one of the caller's notifications read.
    ///
    /// Already-read, unknown and foreign ids succeed without changes; the
    /// return value says whether anything changed.
    pub async fn mark_read(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<bool> {
        let changed = self
            .bounded("mark read", self.store.mark_read(&id, &ctx.user_id))
            .await?;
        debug!(user_id = %ctx.user_id, notification_id = %id, changed, "Mark read");
        Ok(changed)
    }

    /// Mark every notification of the caller read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let changed = self
            .bounded("mark all read", self.store.mark_all_read(&ctx.user_id))
            .await?;
        debug!(user_id = %ctx.user_id, changed, "Mark all read");
        Ok(changed)
    }

    /// Permanently delete every notification of the caller.
    pub async fn clear_all(&self, ctx: &RequestContext) -> AppResult<u64> {
        let removed = self
            .bounded("clear notifications", self.store.clear_all(&ctx.user_id))
            .await?;
        info!(user_id = %ctx.user_id, removed, "Notifications cleared");
        Ok(removed)
    }

    fn effective_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.config.recent_limit)
            .clamp(1, self.config.max_recent_limit.max(1))
    }

    /// Apply the store timeout to one store call.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        let limit = Duration::from_millis(self.config.store_timeout_ms);
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = self.config.store_timeout_ms, "Store call timed out");
                Err(AppError::service_unavailable(format!(
                    "Notification store timed out during {operation}"
                )))
            }
        }
    }
}
