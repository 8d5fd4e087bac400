//! # chat-gateway
//!
//! WebSocket gateway for realtime group chat: sessions, room fanout, the
//! per-room message log, presence, voice signaling and social notifications.
//!
//! All live state is owned by the [`coordinator`]; socket tasks decode
//! frames, consult the directory, and queue commands.

pub mod connection;
pub mod coordinator;
pub mod events;
pub mod handlers;
pub mod presence;
pub mod protocol;
pub mod rooms;
pub mod server;
pub mod social;
pub mod voice;

pub use server::{create_combined_app, create_gateway_state, run, GatewayState};
