//! Denormalized profile summary.

use serde::{Deserialize, Serialize};
use socialhub_core::types::UserId;

/// The public face of a user, captured at the moment it is needed.
///
/// A summary is a snapshot: presence entries keep the one fetched at
/// connect time, and notifications keep the sender's as of creation.
/// Neither is refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    /// Account identifier.
    pub user_id: UserId,
    /// Full display name.
    pub display_name: String,
    /// Unique handle (user name).
    pub handle: String,
    /// Profile image URL, if the user uploaded one.
    pub avatar_url: Option<String>,
}

impl ProfileSummary {
    /// Build a summary from its parts.
    pub fn new(
        user_id: UserId,
        display_name: impl Into<String>,
        handle: impl Into<String>,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            handle: handle.into(),
            avatar_url,
        }
    }
}
