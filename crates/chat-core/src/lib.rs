//! # chat-core
//!
//! Domain layer containing identities, groups, friend requests, chat messages and the
//! directory traits the realtime gateway and the REST API are written against.
//! This crate has zero dependencies on infrastructure (storage, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    random_avatar_color, ChatMessage, DisplayProfile, FriendRequest, Group, GroupKind,
    PendingFriendRequest,
    GroupSummary, NewGroup, NewUser, ProfileUpdate, SettingsUpdate, User, UserSettings,
    AVATAR_COLORS,
};
pub use error::DomainError;
pub use traits::{AccountStore, Directory, RepoResult, TokenError, TokenVerifier};
pub use value_objects::{RoomId, Snowflake, SnowflakeGenerator, SnowflakeParseError};
