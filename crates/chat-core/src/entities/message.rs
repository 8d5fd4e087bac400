//! Chat message entity - an entry in a room's recent history

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DomainError;
use crate::value_objects::{RoomId, Snowflake};

use super::DisplayProfile;

/// Immutable chat message as broadcast to a room and replayed from its history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub username: String,
    pub avatar: String,
    pub text: String,
    pub room: RoomId,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(
        id: Snowflake,
        author: Snowflake,
        display: &DisplayProfile,
        text: String,
        room: RoomId,
    ) -> Self {
        Self {
            id,
            user_id: author,
            username: display.username.clone(),
            avatar: display.avatar.clone(),
            text,
            room,
            timestamp: Utc::now(),
        }
    }

    /// Validate message text, returning it trimmed
    pub fn validate_text(text: &str, max_len: usize) -> Result<String, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::ValidationError(
                "Message text must not be empty".to_string(),
            ));
        }
        if text.chars().count() > max_len {
            return Err(DomainError::ContentTooLong { max: max_len });
        }
        Ok(text.to_string())
    }
}
