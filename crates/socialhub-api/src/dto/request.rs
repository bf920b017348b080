//! Request DTOs with validation.

use serde::Deserialize;
use validator::Validate;

use socialhub_core::error::AppError;
use socialhub_core::types::UserId;
use socialhub_entity::{NotificationKind, TargetKind};
use socialhub_service::{NotificationDraft, TargetDraft};

/// `POST /api/notifications/emit`, sent by the like and message handlers.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmitNotificationRequest {
    #[validate(length(min = 1, max = 128))]
    pub recipient_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[validate(nested)]
    pub target: Option<TargetPayload>,
}

/// What the notification is about.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TargetPayload {
    pub kind: TargetKind,
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    /// Full caption or message text; truncated server-side.
    pub content: Option<String>,
}

impl EmitNotificationRequest {
    /// Validate and convert into the service draft.
    pub fn into_draft(self) -> Result<NotificationDraft, AppError> {
        self.validate()
            .map_err(|e| AppError::validation(format!("Invalid notification: {e}")))?;

        Ok(NotificationDraft {
            recipient_id: UserId::parse(&self.recipient_id)?,
            kind: self.kind,
            target: self.target.map(|t| TargetDraft {
                kind: t.kind,
                id: t.id,
                content: t.content,
            }),
        })
    }
}

/// `GET /api/notifications?limit=N`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
}
