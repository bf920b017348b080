//! Application builder: wires stores, engine and services into an Axum app.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::trace::TraceLayer;
use tracing::info;

use socialhub_auth::JwtDecoder;
use socialhub_core::config::AppConfig;
use socialhub_database::{NotificationStore, ProfileDirectory};
use socialhub_realtime::RealtimeEngine;
use socialhub_service::NotificationService;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Assemble the shared state over the given store backends.
///
/// The notification service pushes through the engine's dispatcher, so a
/// notification created over REST reaches the recipient's live connection.
pub fn build_state(
    config: AppConfig,
    store: Arc<dyn NotificationStore>,
    profiles: Arc<dyn ProfileDirectory>,
) -> AppState {
    let realtime = RealtimeEngine::new(config.realtime.clone(), profiles.clone());

    let notification_service = Arc::new(NotificationService::new(
        store,
        profiles,
        realtime.notifications.clone(),
        config.notifications.clone(),
    ));

    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    info!(
        provider = ?config.database.provider,
        allowed_origins = ?config.server.cors.allowed_origins,
        "Application state built"
    );

    AppState {
        config: Arc::new(config),
        realtime,
        notification_service,
        jwt_decoder,
        database: None,
        started_at: Instant::now(),
    }
}

/// Build the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
