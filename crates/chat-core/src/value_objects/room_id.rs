//! Room identifier

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Snowflake;

/// Identifier of a chat room. Every room is backed by a directory group of the same id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Id of the well-known public room every session starts in
    pub const GENERAL: &'static str = "general";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn general() -> Self {
        Self::new(Self::GENERAL)
    }

    /// Id for a freshly created group
    pub fn for_group(id: Snowflake) -> Self {
        Self(format!("group_{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_general(&self) -> bool {
        self.0 == Self::GENERAL
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
