//! Handshake identity resolution.

use std::fmt;

use tracing::warn;

use socialhub_core::types::UserId;
use socialhub_database::ProfileDirectory;
use socialhub_entity::ProfileSummary;

/// Outcome of checking the `userId` a client supplied at connect time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Well-formed id of an existing user.
    Accepted(ProfileSummary),
    /// Connection stays anonymous.
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Missing,
    Malformed,
    UnknownUser(UserId),
    LookupFailed,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "no user id supplied"),
            Self::Malformed => write!(f, "empty or placeholder user id"),
            Self::UnknownUser(id) => write!(f, "no profile for user {id}"),
            Self::LookupFailed => write!(f, "profile lookup failed"),
        }
    }
}

/// Validate the raw id and fetch the profile summary it names.
///
/// Store failures reject the identity rather than the connection.
pub async fn resolve(raw: Option<&str>, profiles: &dyn ProfileDirectory) -> Identity {
    let Some(raw) = raw else {
        return Identity::Rejected(RejectReason::Missing);
    };
    let Ok(user_id) = UserId::parse(raw) else {
        return Identity::Rejected(RejectReason::Malformed);
    };

    match profiles.find_summary(&user_id).await {
        Ok(Some(profile)) => Identity::Accepted(profile),
        Ok(None) => Identity::Rejected(RejectReason::UnknownUser(user_id)),
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Profile lookup failed during handshake");
            Identity::Rejected(RejectReason::LookupFailed)
        }
    }
}
