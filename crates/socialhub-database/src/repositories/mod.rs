//! PostgreSQL-backed implementations of the store traits.

pub mod notification;
pub mod profile;

pub use notification::PgNotificationStore;
pub use profile::PgProfileDirectory;
