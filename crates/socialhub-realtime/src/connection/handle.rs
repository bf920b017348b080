//! Individual live connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::message::serializer::EncodedFrame;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// Why a frame could not be handed to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// The connection's writer has gone away.
    #[error("connection closed")]
    Closed,
    /// The outbound queue is at capacity; the frame was dropped.
    #[error("outbound queue full")]
    Full,
}

/// Sending side of one live connection.
///
/// The socket writer task owns the matching receiver. Sends never wait:
/// a frame is either queued immediately or reported as failed.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// When the connection was accepted
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<EncodedFrame>,
    alive: AtomicBool,
}

impl ConnectionHandle {
    pub fn new(sender: mpsc::Sender<EncodedFrame>) -> Self {
        Self {
            id: Uuid::new_v4(),
            connected_at: Utc::now(),
            sender,
            alive: AtomicBool::new(true),
        }
    }

    /// Create a handle and the receiver its writer task drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<EncodedFrame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    /// Queue a frame without waiting.
    pub fn send(&self, frame: EncodedFrame) -> Result<(), SendError> {
        if !self.is_alive() {
            return Err(SendError::Closed);
        }
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(SendError::Full),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                Err(SendError::Closed)
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
