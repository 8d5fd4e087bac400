//! Rooms
//!
//! Live subscriber sets, the per-room message log, and the access check made
//! against the directory before a connection is allowed in.

mod access;
mod fanout;
mod history;

pub use access::{authorize, check_access, JoinError};
pub use fanout::RoomFanout;
pub use history::{MessageLog, DEFAULT_HISTORY_CAPACITY};
