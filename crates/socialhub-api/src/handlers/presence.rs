//! Presence endpoints.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, OnlineUsersResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/presence/online
///
/// Same list the last `presence.update` frame carried.
pub async fn online_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Json<ApiResponse<OnlineUsersResponse>> {
    let online_users = state.realtime.registry.snapshot_summaries();
    let count = online_users.len();
    Json(ApiResponse::ok(OnlineUsersResponse {
        online_users,
        count,
    }))
}
