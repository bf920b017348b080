//! # socialhub-entity
//!
//! Domain entity models shared by the store, the realtime engine and the
//! client. All entities derive `Debug`, `Clone`, `Serialize` and
//! `Deserialize`; their JSON form is the wire form (camelCase fields).

pub mod notification;
pub mod profile;

pub use notification::{NewNotification, Notification, NotificationKind, TargetKind, TargetRef};
pub use profile::ProfileSummary;
