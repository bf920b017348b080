//! Live-channel counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level counters, updated lock-free on the hot paths.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_total: AtomicU64,
    connections_active: AtomicU64,
    identities_rejected: AtomicU64,
    registrations_superseded: AtomicU64,
    presence_broadcasts: AtomicU64,
    frames_sent: AtomicU64,
    frames_dropped: AtomicU64,
    notifications_delivered: AtomicU64,
    notifications_offline: AtomicU64,
    notifications_failed: AtomicU64,
}

impl RealtimeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
    }

    pub fn identity_rejected(&self) {
        self.identities_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn registration_superseded(&self) {
        self.registrations_superseded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn presence_broadcast(&self) {
        self.presence_broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frame_sent(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frame_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn notification_delivered(&self) {
        self.notifications_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn notification_offline(&self) {
        self.notifications_offline.fetch_add(1, Ordering::Relaxed);
    }

    pub fn notification_failed(&self) {
        self.notifications_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            identities_rejected: self.identities_rejected.load(Ordering::Relaxed),
            registrations_superseded: self.registrations_superseded.load(Ordering::Relaxed),
            presence_broadcasts: self.presence_broadcasts.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            notifications_delivered: self.notifications_delivered.load(Ordering::Relaxed),
            notifications_offline: self.notifications_offline.load(Ordering::Relaxed),
            notifications_failed: self.notifications_failed.load(Ordering::Relaxed),
        }
    }
}

/// Serializable counter snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Connections accepted since start
    pub connections_total: u64,
    /// Connections currently open
    pub connections_active: u64,
    /// Handshakes whose user id or profile was rejected
    pub identities_rejected: u64,
    /// Registrations that replaced an older connection of the same user
    pub registrations_superseded: u64,
    /// Presence broadcasts performed
    pub presence_broadcasts: u64,
    /// Frames queued to connections
    pub frames_sent: u64,
    /// Frames that could not be queued
    pub frames_dropped: u64,
    /// Notifications pushed to an online recipient
    pub notifications_delivered: u64,
    /// Notifications whose recipient had no live connection
    pub notifications_offline: u64,
    /// Notifications whose push failed
    pub notifications_failed: u64,
}
