//! Shared test helpers for integration tests.
//!
//! Everything runs on the in-memory store, so no database is needed.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use socialhub_api::AppState;
use socialhub_auth::JwtEncoder;
use socialhub_client::LiveSubscriber;
use socialhub_core::config::AppConfig;
use socialhub_core::types::UserId;
use socialhub_database::memory::{MemoryNotificationStore, MemoryProfileDirectory};
use socialhub_entity::ProfileSummary;
use socialhub_realtime::message::OutboundMessage;

/// Test application context
pub struct TestApp {
    /// The Axum router for in-process requests
    pub router: Router,
    /// State behind the router, for inspecting the live engine
    pub state: AppState,
    /// Profile directory seeded with `u1`, `u2` and `u3`
    pub profiles: Arc<MemoryProfileDirectory>,
    encoder: JwtEncoder,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let profiles = Arc::new(MemoryProfileDirectory::new());
        for (id, name, handle) in [
            ("u1", "Ada Lovelace", "ada"),
            ("u2", "Grace Hopper", "grace"),
            ("u3", "Alan Turing", "alan"),
        ] {
            profiles.upsert(ProfileSummary::new(user(id), name, handle, None));
        }

        let encoder = JwtEncoder::new(&config.auth);
        let state = socialhub_api::build_state(
            config,
            Arc::new(MemoryNotificationStore::new()),
            profiles.clone(),
        );
        let router = socialhub_api::build_app(state.clone());

        Self {
            router,
            state,
            profiles,
            encoder,
        }
    }

    /// Bearer token for a user.
    pub fn token(&self, user_id: &str) -> String {
        self.encoder
            .issue(&user(user_id))
            .expect("Failed to issue token")
    }

    /// Serve the app on an ephemeral port; returns the server root URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr: SocketAddr = listener.local_addr().expect("No local addr");
        let app = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });
        format!("http://{addr}")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Emit a post like from `sender` to `recipient`.
    pub async fn like_post(&self, sender: &str, recipient: &str, caption: &str) -> TestResponse {
        let body = serde_json::json!({
            "recipientId": recipient,
            "type": "post_like",
            "target": { "kind": "post", "id": "p1", "content": caption },
        });
        self.request(
            "POST",
            "/api/notifications/emit",
            Some(body),
            Some(&self.token(sender)),
        )
        .await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

pub fn user(id: &str) -> UserId {
    UserId::parse(id).expect("Invalid user id")
}

/// Next event on a live channel, failing the test after two seconds.
pub async fn next_event(live: &mut LiveSubscriber) -> OutboundMessage {
    tokio::time::timeout(Duration::from_secs(2), live.next_event())
        .await
        .expect("Timed out waiting for event")
        .expect("Live channel error")
        .expect("Live channel closed")
}

/// Assert nothing arrives for a short while.
pub async fn expect_silence(live: &mut LiveSubscriber) {
    let waited = tokio::time::timeout(Duration::from_millis(200), live.next_event()).await;
    assert!(waited.is_err(), "Unexpected event: {waited:?}");
}

/// User ids carried by a presence frame.
pub fn presence_ids(event: OutboundMessage) -> Vec<String> {
    match event {
        OutboundMessage::PresenceUpdate(online) => online
            .into_iter()
            .map(|p| p.user_id.into_inner())
            .collect(),
        other => panic!("Expected presence.update, got {other:?}"),
    }
}
