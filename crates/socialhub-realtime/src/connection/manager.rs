//! Connection manager: live connection lifecycle (open, inbound frames, close).

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use socialhub_core::config::RealtimeConfig;
use socialhub_core::types::UserId;
use socialhub_database::ProfileDirectory;

use crate::message::serializer::{self, EncodedFrame};
use crate::message::types::{InboundMessage, OutboundMessage};
use crate::metrics::RealtimeMetrics;
use crate::presence::broadcaster::PresenceBroadcaster;

use super::handle::ConnectionHandle;
use super::identity::{self, Identity};
use super::registry::ConnectionRegistry;

/// How a connection is known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIdentity {
    /// Addressable connection of this user.
    Registered(UserId),
    /// Receives presence updates only.
    BroadcastOnly,
    /// Not tracked at all (anonymous tracking disabled).
    Untracked,
}

/// One accepted live connection.
#[derive(Debug)]
pub struct LiveSession {
    pub handle: Arc<ConnectionHandle>,
    /// Identity captured at connect time; close uses it together with the
    /// handle id, never a fresh registry lookup.
    pub identity: SessionIdentity,
}

impl LiveSession {
    pub fn user_id(&self) -> Option<&UserId> {
        match &self.identity {
            SessionIdentity::Registered(user_id) => Some(user_id),
            _ => None,
        }
    }
}

/// Manages all live connections.
pub struct ConnectionManager {
    registry: Arc<ConnectionRegistry>,
    broadcaster: Arc<PresenceBroadcaster>,
    profiles: Arc<dyn ProfileDirectory>,
    metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.registry.connection_count())
            .field("config", &self.config)
            .finish()
    }
}

impl ConnectionManager {
    pub fn new(
        config: RealtimeConfig,
        registry: Arc<ConnectionRegistry>,
        broadcaster: Arc<PresenceBroadcaster>,
        profiles: Arc<dyn ProfileDirectory>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            profiles,
            metrics,
            config,
        }
    }

    /// Accept a connection and register it under the supplied user id.
    ///
    /// Returns the session and the receiver the socket writer drains.
    /// A rejected identity never fails the connection; it only makes it
    /// broadcast-only (or untracked when anonymous tracking is off).
    pub async fn open(
        &self,
        raw_user_id: Option<&str>,
    ) -> (LiveSession, mpsc::Receiver<EncodedFrame>) {
        let (handle, rx) = ConnectionHandle::channel(self.config.outbound_buffer_size);
        let handle = Arc::new(handle);
        self.metrics.connection_opened();

        let identity = match identity::resolve(raw_user_id, self.profiles.as_ref()).await {
            Identity::Accepted(profile) => {
                let user_id = profile.user_id.clone();
                if let Some(previous) = self.registry.register(profile, handle.clone()) {
                    self.metrics.registration_superseded();
                    info!(
                        user_id = %user_id,
                        conn_id = %handle.id,
                        previous_conn_id = %previous.id,
                        "Connection superseded an older one"
                    );
                }
                info!(conn_id = %handle.id, user_id = %user_id, "Live connection registered");
                self.broadcaster.broadcast();
                SessionIdentity::Registered(user_id)
            }
            Identity::Rejected(reason) => {
                self.metrics.identity_rejected();
                debug!(conn_id = %handle.id, reason = %reason, "Identity rejected");
                if self.config.allow_anonymous {
                    self.registry.track_broadcast_only(handle.clone());
                    if let Err(e) = self.broadcaster.send_snapshot(&handle) {
                        debug!(conn_id = %handle.id, error = %e, "Initial snapshot not delivered");
                    }
                    SessionIdentity::BroadcastOnly
                } else {
                    SessionIdentity::Untracked
                }
            }
        };

        (LiveSession { handle, identity }, rx)
    }

    /// React to a text frame from the client.
    pub fn handle_inbound(&self, session: &LiveSession, raw: &str) {
        match serializer::decode_inbound(raw) {
            Some(InboundMessage::Ping) => {
                let pong = OutboundMessage::Pong {
                    timestamp: Utc::now().timestamp_millis(),
                };
                match serializer::encode(&pong) {
                    Ok(frame) => {
                        if let Err(e) = session.handle.send(frame) {
                            debug!(conn_id = %session.handle.id, error = %e, "Pong not delivered");
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to encode pong"),
                }
            }
            None => {
                debug!(conn_id = %session.handle.id, "Ignoring unrecognized client frame");
            }
        }
    }

    /// Tear down a connection.
    ///
    /// Removes the registry entry only if it still belongs to this
    /// connection, and broadcasts only when the online set changed.
    pub fn close(&self, session: &LiveSession) {
        session.handle.mark_dead();
        self.metrics.connection_closed();

        match &session.identity {
            SessionIdentity::Registered(user_id) => {
                if self.registry.unregister(user_id, session.handle.id) {
                    info!(conn_id = %session.handle.id, user_id = %user_id, "Live connection closed");
                    self.broadcaster.broadcast();
                } else {
                    debug!(
                        conn_id = %session.handle.id,
                        user_id = %user_id,
                        "Superseded connection closed"
                    );
                }
            }
            SessionIdentity::BroadcastOnly => {
                self.registry.release(session.handle.id);
                debug!(conn_id = %session.handle.id, "Anonymous connection closed");
            }
            SessionIdentity::Untracked => {}
        }
    }

    /// Whether the user has an addressable connection.
    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.registry.lookup(user_id).is_some()
    }

    /// Mark every connection dead and empty the registry.
    pub fn close_all(&self) -> usize {
        let handles = self.registry.drain();
        for handle in &handles {
            handle.mark_dead();
        }
        info!(count = handles.len(), "Closed all live connections");
        handles.len()
    }
}

#[cfg(test)]
mod tests {
    use socialhub_database::memory::MemoryProfileDirectory;
    use socialhub_entity::ProfileSummary;

    use super::*;

    fn manager(allow_anonymous: bool) -> ConnectionManager {
        let directory = MemoryProfileDirectory::new();
        for id in ["u1", "u2"] {
            directory.upsert(ProfileSummary::new(
                UserId::parse(id).unwrap(),
                id.to_uppercase(),
                id,
                None,
            ));
        }
        let registry = Arc::new(ConnectionRegistry::new());
        let metrics = Arc::new(RealtimeMetrics::new());
        let broadcaster = Arc::new(PresenceBroadcaster::new(registry.clone(), metrics.clone()));
        ConnectionManager::new(
            RealtimeConfig {
                allow_anonymous,
                ..RealtimeConfig::default()
            },
            registry,
            broadcaster,
            Arc::new(directory),
            metrics,
        )
    }

    fn online_ids(frame: &EncodedFrame) -> Vec<String> {
        match serde_json::from_str::<OutboundMessage>(frame.as_str()).unwrap() {
            OutboundMessage::PresenceUpdate(list) => {
                list.into_iter().map(|p| p.user_id.into_inner()).collect()
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connect_and_disconnect_broadcasts() {
        let manager = manager(true);
        let (a, mut rx_a) = manager.open(Some("u1")).await;
        assert_eq!(online_ids(&rx_a.recv().await.unwrap()), vec!["u1"]);

        let (b, mut rx_b) = manager.open(Some("u2")).await;
        assert_eq!(online_ids(&rx_a.recv().await.unwrap()), vec!["u1", "u2"]);
        assert_eq!(online_ids(&rx_b.recv().await.unwrap()), vec!["u1", "u2"]);

        manager.close(&a);
        assert_eq!(online_ids(&rx_b.recv().await.unwrap()), vec!["u2"]);
        assert!(!manager.is_online(&UserId::parse("u1").unwrap()));
        assert!(manager.is_online(&UserId::parse("u2").unwrap()));
        drop(b);
    }

    #[tokio::test]
    async fn test_rejected_identity_is_broadcast_only() {
        let manager = manager(true);
        let (anon, mut rx_anon) = manager.open(Some("undefined")).await;
        assert_eq!(anon.identity, SessionIdentity::BroadcastOnly);
        assert!(online_ids(&rx_anon.recv().await.unwrap()).is_empty());

        let (_a, _rx_a) = manager.open(Some("u1")).await;
        assert_eq!(online_ids(&rx_anon.recv().await.unwrap()), vec!["u1"]);

        let (unknown, _rx) = manager.open(Some("u404")).await;
        assert_eq!(unknown.identity, SessionIdentity::BroadcastOnly);
    }

    #[tokio::test]
    async fn test_untracked_when_anonymous_disabled() {
        let manager = manager(false);
        let (anon, mut rx) = manager.open(None).await;
        assert_eq!(anon.identity, SessionIdentity::Untracked);
        assert!(rx.try_recv().is_err());
        manager.close(&anon);
    }

    #[tokio::test]
    async fn test_stale_close_keeps_reconnected_user_online() {
        let manager = manager(true);
        let (old, _rx_old) = manager.open(Some("u1")).await;
        let (new, _rx_new) = manager.open(Some("u1")).await;

        manager.close(&old);
        let current = manager.registry.lookup(&UserId::parse("u1").unwrap()).unwrap();
        assert_eq!(current.id, new.handle.id);
        assert_eq!(manager.registry.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_ping_gets_pong() {
        let manager = manager(true);
        let (session, mut rx) = manager.open(Some("u1")).await;
        rx.recv().await.unwrap();

        manager.handle_inbound(&session, r#"{"type":"ping"}"#);
        manager.handle_inbound(&session, r#"{"type":"subscribe"}"#);

        let frame = rx.recv().await.unwrap();
        assert!(matches!(
            serde_json::from_str::<OutboundMessage>(frame.as_str()).unwrap(),
            OutboundMessage::Pong { .. }
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_close_all_empties_registry() {
        let manager = manager(true);
        let (a, _rx_a) = manager.open(Some("u1")).await;
        let (_anon, _rx) = manager.open(None).await;

        assert_eq!(manager.close_all(), 2);
        assert!(!a.handle.is_alive());
        assert_eq!(manager.registry.connection_count(), 0);
    }
}
