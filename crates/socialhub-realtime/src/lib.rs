//! # socialhub-realtime
//!
//! Live-channel engine for SocialHub. Provides:
//!
//! - A connection registry holding at most one addressable connection per user
//! - Full-snapshot presence broadcasts on every connect and disconnect
//! - Best-effort push of freshly persisted notifications
//! - The JSON wire protocol shared with clients
//!
//! Every send is a non-blocking enqueue onto a bounded per-connection queue;
//! a slow or dead peer only ever loses its own frames.

pub mod connection;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod presence;
pub mod server;

pub use connection::manager::{ConnectionManager, LiveSession, SessionIdentity};
pub use connection::registry::ConnectionRegistry;
pub use notification::dispatcher::{DispatchOutcome, NotificationDispatcher};
pub use presence::broadcaster::{BroadcastReport, PresenceBroadcaster};
pub use server::RealtimeEngine;
