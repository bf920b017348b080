//! Route definitions.
//!
//! REST routes are mounted under `/api`; the live channel sits at `/ws`.

use axum::Router;
use axum::routing::{delete, get, patch, post};

use crate::handlers;
use crate::state::AppState;

/// Build the router and thread `AppState` through every route.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(notification_routes())
        .merge(presence_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_handler))
        .with_state(state)
}

/// Notification endpoints
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/emit",
            post(handlers::notification::emit_notification),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/mark-all-read",
            patch(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/clear-all",
            delete(handlers::notification::clear_all),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
}

/// Presence endpoints
fn presence_routes() -> Router<AppState> {
    Router::new().route("/presence/online", get(handlers::presence::online_users))
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
