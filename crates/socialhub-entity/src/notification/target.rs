//! References to the content a notification is about.

use serde::{Deserialize, Serialize};

/// Kind of content a notification points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Post,
    Reel,
    Message,
}

impl TargetKind {
    /// Return the kind as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Reel => "reel",
            Self::Message => "message",
        }
    }

    /// Parse a stored kind string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "post" => Some(Self::Post),
            "reel" => Some(Self::Reel),
            "message" => Some(Self::Message),
            _ => None,
        }
    }
}

/// A post, reel or message reference with an optional short preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: String,
    /// Truncated caption or message text, baked in at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}
