//! Voice signaling
//!
//! Per-room voice rosters. Media never touches the server; only the
//! negotiation payloads exchanged between peers are relayed.

mod relay;

pub use relay::{SignalKind, VoiceJoined, VoiceParticipant, VoiceRelay};
