//! In-memory profile directory.

use async_trait::async_trait;
use dashmap::DashMap;

use socialhub_core::result::AppResult;
use socialhub_core::types::UserId;
use socialhub_entity::ProfileSummary;

use crate::store::ProfileDirectory;

/// [`ProfileDirectory`] seeded explicitly by the caller.
#[derive(Debug, Default)]
pub struct MemoryProfileDirectory {
    profiles: DashMap<UserId, ProfileSummary>,
}

impl MemoryProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile.
    pub fn upsert(&self, summary: ProfileSummary) {
        self.profiles.insert(summary.user_id.clone(), summary);
    }

    pub fn remove(&self, user_id: &UserId) -> Option<ProfileSummary> {
        self.profiles.remove(user_id).map(|(_, summary)| summary)
    }
}

#[async_trait]
impl ProfileDirectory for MemoryProfileDirectory {
    async fn find_summary(&self, user_id: &UserId) -> AppResult<Option<ProfileSummary>> {
        Ok(self.profiles.get(user_id).map(|entry| entry.value().clone()))
    }
}
