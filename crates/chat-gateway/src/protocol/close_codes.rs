//! WebSocket close codes
//!
//! Defines gateway-specific close codes for WebSocket connections.

use serde::{Deserialize, Serialize};

/// Gateway WebSocket close codes
///
/// These codes are sent when the gateway closes a connection. Recoverable
/// problems (bad event payloads, rejected tokens) are reported as `error`
/// events instead and keep the connection open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred
    UnknownError = 4000,
    /// Invalid or server-only opcode sent
    UnknownOpcode = 4001,
    /// Frame was not a valid JSON envelope
    DecodeError = 4002,
    /// No heartbeat within the timeout window
    SessionTimeout = 4009,
}

impl CloseCode {
    /// Create a `CloseCode` from a raw u16 value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            4000 => Some(Self::UnknownError),
            4001 => Some(Self::UnknownOpcode),
            4002 => Some(Self::DecodeError),
            4009 => Some(Self::SessionTimeout),
            _ => None,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::UnknownOpcode => "Invalid opcode sent",
            Self::DecodeError => "Invalid payload encoding",
            Self::SessionTimeout => "Session timeout",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnknownError => "UnknownError",
            Self::UnknownOpcode => "UnknownOpcode",
            Self::DecodeError => "DecodeError",
            Self::SessionTimeout => "SessionTimeout",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}
