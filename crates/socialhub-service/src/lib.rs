//! # socialhub-service
//!
//! Notification use cases. [`NotificationService`] owns the write path
//! (persist, then hand the stored record to a [`NotificationPusher`]) and
//! the read path clients poll when push delivery was missed.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod notification;

pub use context::RequestContext;
pub use notification::{
    NoopPusher, NotificationDraft, NotificationPusher, NotificationRules, NotificationService,
    TargetDraft,
};
