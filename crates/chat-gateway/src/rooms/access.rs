//! Room access check
//!
//! Runs against the directory before any room state is touched, so a
//! rejected join leaves every subscriber set as it was.

use chat_core::{Directory, DomainError, Group, RoomId, Snowflake};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JoinError {
    #[error("Group not found")]
    RoomNotFound(RoomId),

    #[error("Cannot join private group without invitation")]
    AccessDenied(RoomId),

    #[error(transparent)]
    Directory(#[from] DomainError),
}

/// Look up `room` and check that `user_id` may enter it, without recording
/// anything in the directory.
pub async fn check_access(
    directory: &dyn Directory,
    room: &RoomId,
    user_id: Snowflake,
) -> Result<Group, JoinError> {
    let group = directory
        .find_group(room)
        .await?
        .ok_or_else(|| JoinError::RoomNotFound(room.clone()))?;

    if group.is_private() && !group.has_member(user_id) {
        tracing::debug!(room = %room, user_id = %user_id, "Private room access refused");
        return Err(JoinError::AccessDenied(room.clone()));
    }
    Ok(group)
}

/// Check access and record durable membership for public groups the user
/// has not joined yet.
pub async fn authorize(
    directory: &dyn Directory,
    room: &RoomId,
    user_id: Snowflake,
) -> Result<Group, JoinError> {
    let group = check_access(directory, room, user_id).await?;
    if group.has_member(user_id) {
        return Ok(group);
    }

    match directory.join_group(room, user_id).await {
        Ok(group) => Ok(group),
        Err(DomainError::GroupNotFound(_)) => Err(JoinError::RoomNotFound(room.clone())),
        Err(DomainError::PrivateGroup(_)) => Err(JoinError::AccessDenied(room.clone())),
        Err(e) => Err(e.into()),
    }
}
