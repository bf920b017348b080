//! Live connection lifecycle and bookkeeping.

pub mod handle;
pub mod identity;
pub mod manager;
pub mod registry;

pub use handle::{ConnectionHandle, ConnectionId, SendError};
pub use identity::{Identity, RejectReason};
