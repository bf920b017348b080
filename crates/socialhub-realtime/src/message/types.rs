//! Inbound and outbound live-channel message definitions.

use serde::{Deserialize, Serialize};

use socialhub_entity::{Notification, ProfileSummary};

/// Frames pushed by the server, tagged by `event` with the body in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum OutboundMessage {
    /// The complete online set. Receivers replace their local copy.
    #[serde(rename = "presence.update")]
    PresenceUpdate(Vec<ProfileSummary>),
    /// A notification that was just persisted for the receiver.
    #[serde(rename = "notification.new")]
    NotificationNew(Notification),
    /// Reply to a client ping.
    #[serde(rename = "pong")]
    Pong {
        /// Server time in milliseconds since the epoch.
        timestamp: i64,
    },
}

/// Frames sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Application-level keepalive.
    Ping,
}

#[cfg(test)]
mod tests {
    use socialhub_core::types::UserId;

    use super::*;

    #[test]
    fn test_presence_update_shape() {
        let msg = OutboundMessage::PresenceUpdate(vec![ProfileSummary::new(
            UserId::parse("u1").unwrap(),
            "Ada",
            "ada",
            None,
        )]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "presence.update");
        assert_eq!(json["data"][0]["userId"], "u1");
        assert_eq!(json["data"][0]["avatarUrl"], serde_json::Value::Null);
    }

    #[test]
    fn test_pong_shape() {
        let json = serde_json::to_value(OutboundMessage::Pong { timestamp: 42 }).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "pong", "data": { "timestamp": 42 } }));
    }

    #[test]
    fn test_inbound_ping() {
        let msg: InboundMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(msg, InboundMessage::Ping);
    }
}
