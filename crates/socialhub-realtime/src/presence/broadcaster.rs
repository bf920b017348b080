//! Presence broadcaster: pushes the full online set to every connection.
//!
//! Each connect and disconnect produces one broadcast carrying the complete
//! snapshot; receivers replace their local set. The cost is one enqueue per
//! tracked connection per event. There is no batching or delta encoding.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::connection::handle::{ConnectionHandle, SendError};
use crate::connection::registry::ConnectionRegistry;
use crate::message::serializer;
use crate::message::types::OutboundMessage;
use crate::metrics::RealtimeMetrics;

/// Per-broadcast delivery tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    /// Users in the snapshot.
    pub online: usize,
    /// Connections the frame was queued to.
    pub delivered: usize,
    /// Connections that were closed or had a full queue.
    pub failed: usize,
}

/// Keeps every client's online set in line with the registry.
#[derive(Debug)]
pub struct PresenceBroadcaster {
    registry: Arc<ConnectionRegistry>,
    metrics: Arc<RealtimeMetrics>,
    /// Serializes snapshot-and-send so a later snapshot is never queued
    /// ahead of an earlier one on any connection.
    sequence: Mutex<()>,
}

impl PresenceBroadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            registry,
            metrics,
            sequence: Mutex::new(()),
        }
    }

    /// Send the current snapshot to every tracked connection.
    ///
    /// A failure on one connection never affects delivery to the others.
    pub fn broadcast(&self) -> BroadcastReport {
        let _turn = self.sequence.lock().unwrap_or_else(|e| e.into_inner());

        let snapshot = self.registry.snapshot_summaries();
        let mut report = BroadcastReport {
            online: snapshot.len(),
            ..BroadcastReport::default()
        };
        let Some(frame) = encode_snapshot(snapshot) else {
            return report;
        };

        for handle in self.registry.all_connections() {
            match self.deliver(&handle, &frame) {
                Ok(()) => report.delivered += 1,
                Err(_) => report.failed += 1,
            }
        }

        self.metrics.presence_broadcast();
        debug!(
            online = report.online,
            delivered = report.delivered,
            failed = report.failed,
            "Presence broadcast"
        );
        report
    }

    /// Send the current snapshot to one connection only.
    ///
    /// Used for connections that joined without changing the online set.
    pub fn send_snapshot(&self, handle: &ConnectionHandle) -> Result<(), SendError> {
        let _turn = self.sequence.lock().unwrap_or_else(|e| e.into_inner());
        let frame =
            encode_snapshot(self.registry.snapshot_summaries()).ok_or(SendError::Closed)?;
        self.deliver(handle, &frame)
    }

    fn deliver(
        &self,
        handle: &ConnectionHandle,
        frame: &serializer::EncodedFrame,
    ) -> Result<(), SendError> {
        match handle.send(frame.clone()) {
            Ok(()) => {
                self.metrics.frame_sent();
                Ok(())
            }
            Err(e) => {
                self.metrics.frame_dropped();
                warn!(conn_id = %handle.id, error = %e, "Presence update not delivered");
                Err(e)
            }
        }
    }
}

fn encode_snapshot(
    snapshot: Vec<socialhub_entity::ProfileSummary>,
) -> Option<serializer::EncodedFrame> {
    match serializer::encode(&OutboundMessage::PresenceUpdate(snapshot)) {
        Ok(frame) => Some(frame),
        Err(e) => {
            error!(error = %e, "Failed to encode presence update");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use socialhub_core::types::UserId;
    use socialhub_entity::ProfileSummary;
    use tokio::sync::mpsc;

    use super::*;
    use crate::message::serializer::EncodedFrame;

    fn profile(id: &str) -> ProfileSummary {
        ProfileSummary::new(UserId::parse(id).unwrap(), id, id, None)
    }

    fn connect(
        registry: &ConnectionRegistry,
        id: &str,
        capacity: usize,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<EncodedFrame>) {
        let (handle, rx) = ConnectionHandle::channel(capacity);
        let handle = Arc::new(handle);
        registry.register(profile(id), handle.clone());
        (handle, rx)
    }

    fn online_ids(frame: &EncodedFrame) -> Vec<String> {
        match serde_json::from_str::<OutboundMessage>(frame.as_str()).unwrap() {
            OutboundMessage::PresenceUpdate(list) => {
                list.into_iter().map(|p| p.user_id.into_inner()).collect()
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    fn setup() -> (Arc<ConnectionRegistry>, PresenceBroadcaster) {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster =
            PresenceBroadcaster::new(registry.clone(), Arc::new(RealtimeMetrics::new()));
        (registry, broadcaster)
    }

    #[test]
    fn test_everyone_receives_full_snapshot() {
        let (registry, broadcaster) = setup();
        let (_a, mut rx_a) = connect(&registry, "u1", 8);
        let (_b, mut rx_b) = connect(&registry, "u2", 8);

        let report = broadcaster.broadcast();
        assert_eq!(report, BroadcastReport { online: 2, delivered: 2, failed: 0 });

        assert_eq!(online_ids(&rx_a.try_recv().unwrap()), vec!["u1", "u2"]);
        assert_eq!(online_ids(&rx_b.try_recv().unwrap()), vec!["u1", "u2"]);
    }

    #[test]
    fn test_failed_recipient_is_isolated() {
        let (registry, broadcaster) = setup();
        let (_a, rx_a) = connect(&registry, "u1", 8);
        let (_b, mut rx_b) = connect(&registry, "u2", 8);
        let (_c, _rx_c) = connect(&registry, "u3", 1);
        drop(rx_a);

        broadcaster.broadcast();
        let report = broadcaster.broadcast();

        // u1 is closed, u3's single-slot queue is still full from the first round.
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 2);
        assert!(rx_b.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn test_broadcast_only_connections_are_included() {
        let (registry, broadcaster) = setup();
        let (_a, _rx_a) = connect(&registry, "u1", 8);
        let (anon, mut rx_anon) = ConnectionHandle::channel(8);
        registry.track_broadcast_only(Arc::new(anon));

        let report = broadcaster.broadcast();
        assert_eq!(report.online, 1);
        assert_eq!(report.delivered, 2);
        assert_eq!(online_ids(&rx_anon.try_recv().unwrap()), vec!["u1"]);
    }

    #[test]
    fn test_send_snapshot_targets_one_connection() {
        let (registry, broadcaster) = setup();
        let (_a, mut rx_a) = connect(&registry, "u1", 8);
        let (anon, mut rx_anon) = ConnectionHandle::channel(8);

        broadcaster.send_snapshot(&anon).unwrap();
        assert_eq!(online_ids(&rx_anon.try_recv().unwrap()), vec!["u1"]);
        assert!(rx_a.try_recv().is_err());
    }
}
