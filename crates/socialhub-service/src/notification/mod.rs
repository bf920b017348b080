//! Notification creation, delivery hand-off and read-state transitions.

pub mod formatter;
pub mod pusher;
pub mod rules;
pub mod service;

pub use pusher::{NoopPusher, NotificationPusher};
pub use rules::NotificationRules;
pub use service::{NotificationDraft, NotificationService, TargetDraft};
