//! JSON encoding of live-channel frames.

use std::sync::Arc;

use super::types::{InboundMessage, OutboundMessage};

/// A serialized outbound frame.
///
/// Encoded once and shared, so a broadcast to many connections costs one
/// serialization and a reference-count bump per recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame(Arc<str>);

impl EncodedFrame {
    /// Wrap already-encoded text.
    pub fn from_text(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Serialize an outbound message.
pub fn encode(msg: &OutboundMessage) -> Result<EncodedFrame, serde_json::Error> {
    serde_json::to_string(msg).map(EncodedFrame::from_text)
}

/// Parse a client frame. Unknown or malformed frames yield `None`.
pub fn decode_inbound(text: &str) -> Option<InboundMessage> {
    serde_json::from_str(text).ok()
}
