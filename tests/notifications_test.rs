//! Integration tests for the notification REST endpoints.

mod helpers;

use axum::http::StatusCode;

use helpers::TestApp;

#[tokio::test]
async fn test_endpoints_require_token() {
    let app = TestApp::new();

    for (method, path) in [
        ("GET", "/api/notifications"),
        ("GET", "/api/notifications/unread-count"),
        ("PATCH", "/api/notifications/mark-all-read"),
        ("DELETE", "/api/notifications/clear-all"),
        ("GET", "/api/presence/online"),
    ] {
        let response = app.request(method, path, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{method} {path}");
        assert_eq!(response.body["error"], "UNAUTHORIZED");
    }

    let response = app
        .request("GET", "/api/notifications", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_emit_persists_denormalized_record() {
    let app = TestApp::new();

    let response = app
        .like_post("u1", "u2", "a very long caption about a weekend trip to the mountains")
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let data = &response.body["data"];
    assert_eq!(data["recipientId"], "u2");
    assert_eq!(data["senderId"], "u1");
    assert_eq!(data["sender"]["displayName"], "Ada Lovelace");
    assert_eq!(data["type"], "post_like");
    assert_eq!(data["message"], "liked your post");
    assert_eq!(data["read"], false);
    assert_eq!(data["target"]["preview"], "a very long caption about a we...");
}

#[tokio::test]
async fn test_self_like_is_suppressed() {
    let app = TestApp::new();

    let response = app.like_post("u1", "u1", "mine").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].is_null());

    let token = app.token("u1");
    let count = app
        .request("GET", "/api/notifications/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.body["unreadCount"], 0);
}

#[tokio::test]
async fn test_emit_from_unknown_sender_is_not_found() {
    let app = TestApp::new();
    let response = app.like_post("ghost", "u2", "hi").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_emit_rejects_placeholder_recipient() {
    let app = TestApp::new();
    let response = app.like_post("u1", "undefined", "hi").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_is_newest_first_and_bounded() {
    let app = TestApp::new();
    for caption in ["first", "second", "third"] {
        app.like_post("u1", "u2", caption).await;
    }
    let token = app.token("u2");

    let all = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    let previews: Vec<&str> = all
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["target"]["preview"].as_str().unwrap())
        .collect();
    assert_eq!(previews, vec!["third", "second", "first"]);

    let one = app
        .request("GET", "/api/notifications?limit=1", None, Some(&token))
        .await;
    assert_eq!(one.body.as_array().unwrap().len(), 1);

    let zero = app
        .request("GET", "/api/notifications?limit=0", None, Some(&token))
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    // Other users see nothing.
    let other = app
        .request("GET", "/api/notifications", None, Some(&app.token("u3")))
        .await;
    assert!(other.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_read_is_idempotent_and_recipient_scoped() {
    let app = TestApp::new();
    let created = app.like_post("u1", "u2", "hello").await;
    let id = created.body["data"]["id"].as_str().unwrap().to_string();
    let path = format!("/api/notifications/{id}/read");
    let owner = app.token("u2");

    let foreign = app
        .request("PATCH", &path, None, Some(&app.token("u3")))
        .await;
    assert_eq!(foreign.status, StatusCode::OK);
    assert_eq!(foreign.body["affected"], 0);

    let first = app.request("PATCH", &path, None, Some(&owner)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["affected"], 1);

    let second = app.request("PATCH", &path, None, Some(&owner)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["affected"], 0);

    let count = app
        .request("GET", "/api/notifications/unread-count", None, Some(&owner))
        .await;
    assert_eq!(count.body["unreadCount"], 0);
}

#[tokio::test]
async fn test_mark_read_with_malformed_id() {
    let app = TestApp::new();
    let response = app
        .request(
            "PATCH",
            "/api/notifications/not-a-uuid/read",
            None,
            Some(&app.token("u2")),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mark_all_read_and_clear_all() {
    let app = TestApp::new();
    app.like_post("u1", "u2", "one").await;
    app.like_post("u3", "u2", "two").await;
    app.like_post("u2", "u1", "three").await;
    let token = app.token("u2");

    let count = app
        .request("GET", "/api/notifications/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.body["unreadCount"], 2);

    let marked = app
        .request("PATCH", "/api/notifications/mark-all-read", None, Some(&token))
        .await;
    assert_eq!(marked.body["affected"], 2);
    let again = app
        .request("PATCH", "/api/notifications/mark-all-read", None, Some(&token))
        .await;
    assert_eq!(again.body["affected"], 0);

    let cleared = app
        .request("DELETE", "/api/notifications/clear-all", None, Some(&token))
        .await;
    assert_eq!(cleared.body["affected"], 2);

    let list = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    assert!(list.body.as_array().unwrap().is_empty());

    // u1's notification is untouched.
    let other = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some(&app.token("u1")),
        )
        .await;
    assert_eq!(other.body["unreadCount"], 1);
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");

    let detailed = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(detailed.status, StatusCode::OK);
    assert_eq!(detailed.body["data"]["database"], "memory");
    assert_eq!(detailed.body["data"]["online_users"], 0);
    assert_eq!(detailed.body["data"]["poll_interval_seconds"], 30);
}
