//! Process-local implementations of the store traits.
//!
//! Used by `database.provider = "memory"` and by tests. Data lives for the
//! lifetime of the process.

pub mod notification;
pub mod profile;

pub use notification::MemoryNotificationStore;
pub use profile::MemoryProfileDirectory;
