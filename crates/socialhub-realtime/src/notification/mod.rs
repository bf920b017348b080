//! Live notification delivery.

pub mod dispatcher;

pub use dispatcher::{DispatchOutcome, NotificationDispatcher};
