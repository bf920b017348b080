//! Wire protocol of the live channel.

pub mod serializer;
pub mod types;

pub use serializer::EncodedFrame;
pub use types::{InboundMessage, OutboundMessage};
