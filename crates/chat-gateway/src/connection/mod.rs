//! Connection management
//!
//! Open sockets, the sessions bound to them, and the identity index used for
//! unicast delivery.

mod connection;
mod manager;
mod registry;
mod session;

pub use connection::{Connection, ConnectionId, Outbound};
pub use manager::ConnectionManager;
pub use registry::SessionRegistry;
pub use session::Session;
