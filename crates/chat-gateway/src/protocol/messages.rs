//! Gateway message format
//!
//! Every frame in either direction is a JSON object `{op, t, s, d}`.

use super::{CloseCode, HelloPayload, OpCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event name (Dispatch and Event only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Per-connection sequence number (Dispatch only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

/// Just enough of a frame to tell a bad opcode from bad JSON.
#[derive(Deserialize)]
struct RawOp {
    op: u8,
}

impl GatewayMessage {
    // === Server Messages ===

    /// Create a Dispatch message (op=0)
    #[must_use]
    pub fn dispatch(event: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(event.into()),
            s: Some(sequence),
            d: Some(data),
        }
    }

    /// Create a Hello message (op=10)
    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self {
            op: OpCode::Hello,
            t: None,
            s: None,
            d: serde_json::to_value(payload).ok(),
        }
    }

    /// Create a Heartbeat ACK message (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self {
            op: OpCode::HeartbeatAck,
            t: None,
            s: None,
            d: None,
        }
    }

    // === Client Messages ===

    /// Create a named client event (op=2)
    #[must_use]
    pub fn event(name: impl Into<String>, data: Value) -> Self {
        Self {
            op: OpCode::Event,
            t: Some(name.into()),
            s: None,
            d: Some(data),
        }
    }

    /// Decode a client text frame.
    ///
    /// A frame whose `op` parses but is not a client op closes with
    /// `UnknownOpcode`; anything else that fails to parse is a `DecodeError`.
    pub fn decode(json: &str) -> Result<Self, CloseCode> {
        match serde_json::from_str::<Self>(json) {
            Ok(message) if message.op.is_client_op() => Ok(message),
            Ok(_) => Err(CloseCode::UnknownOpcode),
            Err(_) => match serde_json::from_str::<RawOp>(json) {
                Ok(raw) if OpCode::from_u8(raw.op).is_none() => Err(CloseCode::UnknownOpcode),
                _ => Err(CloseCode::DecodeError),
            },
        }
    }

    /// Try to parse the heartbeat sequence number (op=1)
    pub fn as_heartbeat_seq(&self) -> Option<Option<u64>> {
        if self.op != OpCode::Heartbeat {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_u64))
    }

    /// Deserialize `d` into a typed payload, treating a missing `d` as `null`.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.d.clone().unwrap_or(Value::Null))
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
