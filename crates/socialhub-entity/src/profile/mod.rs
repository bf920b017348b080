//! User profile value objects.

pub mod summary;

pub use summary::ProfileSummary;
