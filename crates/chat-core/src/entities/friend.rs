//! Friend requests

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::User;
use crate::value_objects::Snowflake;

/// A pending friend request. At most one per (from, to) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendRequest {
    pub id: String,
    pub from: Snowflake,
    pub to: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl FriendRequest {
    pub fn new(from: Snowflake, to: Snowflake) -> Self {
        Self {
            id: Self::request_id(from, to),
            from,
            to,
            created_at: Utc::now(),
        }
    }

    /// Requests are keyed by sender and recipient, so resending replaces the old one
    pub fn request_id(from: Snowflake, to: Snowflake) -> String {
        format!("{from}_{to}")
    }
}

/// Incoming request as listed to its recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingFriendRequest {
    pub id: String,
    pub from: User,
    pub timestamp: DateTime<Utc>,
}
