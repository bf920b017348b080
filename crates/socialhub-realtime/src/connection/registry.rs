//! Connection registry: who is currently reachable by push.
//!
//! Holds at most one addressable connection per user, together with the
//! profile summary captured at connect time. Connections without an
//! accepted identity, and connections replaced by a newer one of the same
//! user, stay in a separate broadcast-only set: they still receive presence
//! updates but are never returned by [`ConnectionRegistry::lookup`].
//!
//! All state sits behind one lock so readers always see both sets and every
//! entry whole.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use socialhub_core::types::UserId;
use socialhub_entity::ProfileSummary;

use super::handle::{ConnectionHandle, ConnectionId};

#[derive(Debug)]
struct Entry {
    handle: Arc<ConnectionHandle>,
    profile: ProfileSummary,
}

#[derive(Debug, Default)]
struct Inner {
    by_user: HashMap<UserId, Entry>,
    broadcast_only: HashMap<ConnectionId, Arc<ConnectionHandle>>,
}

/// Process-wide registry of live connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    inner: RwLock<Inner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `handle` the addressable connection of `profile.user_id`.
    ///
    /// Returns the handle it replaced, if any. The replaced connection is
    /// not closed; it is moved to the broadcast-only set while it is alive.
    pub fn register(
        &self,
        profile: ProfileSummary,
        handle: Arc<ConnectionHandle>,
    ) -> Option<Arc<ConnectionHandle>> {
        let mut inner = self.write();
        let connection_id = handle.id;
        inner.broadcast_only.remove(&connection_id);

        let user_id = profile.user_id.clone();
        let previous = inner.by_user.insert(user_id, Entry { handle, profile })?;
        if previous.handle.id == connection_id {
            return None;
        }
        if previous.handle.is_alive() {
            inner
                .broadcast_only
                .insert(previous.handle.id, previous.handle.clone());
        }
        Some(previous.handle)
    }

    /// Track a connection that has no addressable identity.
    pub fn track_broadcast_only(&self, handle: Arc<ConnectionHandle>) {
        self.write().broadcast_only.insert(handle.id, handle);
    }

    /// Remove the entry of `user_id` if it still belongs to `connection_id`.
    ///
    /// A newer registration for the same user is never removed. The
    /// connection's broadcast-only slot, if it has one, is always released.
    /// Returns `true` only when the addressable entry was removed; absent
    /// users and repeated calls are no-ops.
    pub fn unregister(&self, user_id: &UserId, connection_id: ConnectionId) -> bool {
        let mut inner = self.write();
        inner.broadcast_only.remove(&connection_id);

        let owned = inner
            .by_user
            .get(user_id)
            .is_some_and(|entry| entry.handle.id == connection_id);
        if owned {
            inner.by_user.remove(user_id);
        }
        owned
    }

    /// Drop a broadcast-only connection. Returns whether it was tracked.
    pub fn release(&self, connection_id: ConnectionId) -> bool {
        self.write().broadcast_only.remove(&connection_id).is_some()
    }

    /// The addressable connection of a user.
    pub fn lookup(&self, user_id: &UserId) -> Option<Arc<ConnectionHandle>> {
        self.read()
            .by_user
            .get(user_id)
            .map(|entry| entry.handle.clone())
    }

    /// Profile summaries of every registered user, ordered by user id.
    pub fn snapshot_summaries(&self) -> Vec<ProfileSummary> {
        let mut summaries: Vec<ProfileSummary> = self
            .read()
            .by_user
            .values()
            .map(|entry| entry.profile.clone())
            .collect();
        summaries.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        summaries
    }

    /// Every tracked connection, addressable or not.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        let inner = self.read();
        inner
            .by_user
            .values()
            .map(|entry| entry.handle.clone())
            .chain(inner.broadcast_only.values().cloned())
            .collect()
    }

    /// Number of users with an addressable connection.
    pub fn online_count(&self) -> usize {
        self.read().by_user.len()
    }

    /// Number of tracked connections.
    pub fn connection_count(&self) -> usize {
        let inner = self.read();
        inner.by_user.len() + inner.broadcast_only.len()
    }

    /// Remove everything and return the handles that were tracked.
    pub fn drain(&self) -> Vec<Arc<ConnectionHandle>> {
        let mut inner = self.write();
        let by_user = std::mem::take(&mut inner.by_user);
        let broadcast_only = std::mem::take(&mut inner.broadcast_only);
        by_user
            .into_values()
            .map(|entry| entry.handle)
            .chain(broadcast_only.into_values())
            .collect()
    }
}
