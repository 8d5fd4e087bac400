//! Value objects - immutable types that represent domain concepts

mod room_id;
mod snowflake;

pub use room_id::RoomId;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
