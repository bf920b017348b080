//! Notification kind enumeration.

use serde::{Deserialize, Serialize};

/// What happened to produce a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone liked one of the recipient's posts.
    PostLike,
    /// Someone liked one of the recipient's reels.
    ReelLike,
    /// Someone sent the recipient a direct message.
    Message,
}

impl NotificationKind {
    /// Return the kind as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostLike => "post_like",
            Self::ReelLike => "reel_like",
            Self::Message => "message",
        }
    }

    /// Parse a stored kind string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "post_like" => Some(Self::PostLike),
            "reel_like" => Some(Self::ReelLike),
            "message" => Some(Self::Message),
            _ => None,
        }
    }

    /// Whether this kind is a like and therefore never self-addressed.
    pub fn is_like(&self) -> bool {
        matches!(self, Self::PostLike | Self::ReelLike)
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
