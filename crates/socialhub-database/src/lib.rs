//! # socialhub-database
//!
//! Persistence seams for the notification core. The [`NotificationStore`]
//! and [`ProfileDirectory`] traits are what the service and realtime crates
//! depend on; PostgreSQL implementations live in [`repositories`] and
//! process-local ones in [`memory`].

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{NotificationStore, ProfileDirectory};
