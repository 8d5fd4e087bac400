//! Integration test utilities for the chat server
//!
//! Starts the real server on a loopback port and drives it over HTTP and
//! WebSocket.

pub mod fixtures;
pub mod gateway;
pub mod helpers;

pub use fixtures::*;
pub use gateway::GatewayClient;
pub use helpers::*;
