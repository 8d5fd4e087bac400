//! Individual WebSocket connection
//!
//! The handle the rest of the gateway holds for one open socket. Writes go
//! through a bounded channel drained by the socket's send task, so delivery
//! never blocks the caller.

use crate::events::ServerEvent;
use crate::protocol::{CloseCode, GatewayMessage};
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

/// Opaque per-socket identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a new random connection id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Item queued for the socket writer
#[derive(Debug, Clone)]
pub enum Outbound {
    Message(GatewayMessage),
    /// Send a close frame and stop writing
    Close(CloseCode),
}

/// A single WebSocket connection
pub struct Connection {
    id: ConnectionId,

    /// Channel drained by the socket's send task
    sender: mpsc::Sender<Outbound>,

    /// Last sequence number assigned to a Dispatch
    sequence: AtomicU64,

    last_heartbeat: Mutex<Instant>,

    created_at: Instant,
}

impl Connection {
    pub fn new(id: ConnectionId, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            id,
            sender,
            sequence: AtomicU64::new(0),
            last_heartbeat: Mutex::new(Instant::now()),
            created_at: Instant::now(),
        })
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Get the next sequence number
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get the current sequence number
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Record a heartbeat received
    pub fn record_heartbeat(&self) {
        *self.last_heartbeat.lock() = Instant::now();
    }

    /// Get time since last heartbeat
    pub fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.lock().elapsed()
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Queue a raw frame without waiting.
    ///
    /// Returns `false` when the connection is gone or its buffer is full; the
    /// frame is dropped in both cases.
    pub fn send(&self, message: GatewayMessage) -> bool {
        self.enqueue(Outbound::Message(message))
    }

    /// Queue a Dispatch frame for `event`, stamping the next sequence number
    pub fn dispatch(&self, event: ServerEvent, data: Value) -> bool {
        let message = GatewayMessage::dispatch(event.as_str(), self.next_sequence(), data);
        self.enqueue(Outbound::Message(message))
    }

    /// Ask the writer to close the socket with `code`
    pub fn close(&self, code: CloseCode) -> bool {
        self.enqueue(Outbound::Close(code))
    }

    /// Check if the writer side has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn enqueue(&self, item: Outbound) -> bool {
        match self.sender.try_send(item) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(connection_id = %self.id, "Outbound buffer full, dropping frame");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::trace!(connection_id = %self.id, "Connection closed, dropping frame");
                false
            }
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .field("created_at", &self.created_at)
            .finish()
    }
}
