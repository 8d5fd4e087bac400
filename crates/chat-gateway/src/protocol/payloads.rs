//! Envelope-level payloads

use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after the socket is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}
