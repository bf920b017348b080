//! Notification endpoints: creation for the CRUD layer, plus the poll
//! fallback and read-state mutations for clients.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use socialhub_core::error::AppError;
use socialhub_core::types::NotificationId;
use socialhub_entity::Notification;

use crate::dto::request::{EmitNotificationRequest, ListQuery};
use crate::dto::response::{ApiResponse, MutationResponse, UnreadCountResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/notifications/emit
///
/// Persists first, then pushes. `201` with the stored record, or `200` with
/// `null` when the notification was suppressed (self-like).
pub async fn emit_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<EmitNotificationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Option<Notification>>>), AppError> {
    let draft = req.into_draft()?;
    let created = state.notification_service.notify(&auth, draft).await?;

    let status = if created.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::ok(created))))
}

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    query
        .validate()
        .map_err(|e| AppError::validation(format!("Invalid query: {e}")))?;

    let notifications = state
        .notification_service
        .list_recent(&auth, query.limit)
        .await?;
    Ok(Json(notifications))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread_count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let id: NotificationId = id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid notification id: {id}")))?;

    let changed = state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(MutationResponse::new(u64::from(changed))))
}

/// PATCH /api/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MutationResponse>, AppError> {
    let affected = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(MutationResponse::new(affected)))
}

/// DELETE /api/notifications/clear-all
pub async fn clear_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MutationResponse>, AppError> {
    let affected = state.notification_service.clear_all(&auth).await?;
    Ok(Json(MutationResponse::new(affected)))
}
