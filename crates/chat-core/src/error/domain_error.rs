//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{RoomId, Snowflake};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("User not found")]
    UsernameNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(RoomId),

    #[error("Friend request not found")]
    FriendRequestNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Cannot join private group without invitation")]
    PrivateGroup(RoomId),

    #[error("Only admins can add members")]
    NotGroupAdmin,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Already friends")]
    AlreadyFriends,

    #[error("Cannot send friend request to yourself")]
    SelfFriendRequest,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) | Self::UsernameNotFound(_) => "UNKNOWN_USER",
            Self::GroupNotFound(_) => "UNKNOWN_GROUP",
            Self::FriendRequestNotFound(_) => "UNKNOWN_FRIEND_REQUEST",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::PrivateGroup(_) => "PRIVATE_GROUP",
            Self::NotGroupAdmin => "NOT_GROUP_ADMIN",

            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::AlreadyFriends => "ALREADY_FRIENDS",
            Self::SelfFriendRequest => "SELF_FRIEND_REQUEST",

            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::UsernameNotFound(_)
                | Self::GroupNotFound(_)
                | Self::FriendRequestNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::ContentTooLong { .. } | Self::SelfFriendRequest
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::PrivateGroup(_) | Self::NotGroupAdmin
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists | Self::UsernameTaken | Self::AlreadyFriends
        )
    }
}
