//! Notification domain entities.

pub mod kind;
pub mod model;
pub mod target;

pub use kind::NotificationKind;
pub use model::{NewNotification, Notification};
pub use target::{TargetKind, TargetRef};
