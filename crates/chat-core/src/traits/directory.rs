//! Directory traits (ports) - durable identities, groups and friendships
//!
//! The realtime gateway only talks to [`Directory`]; the REST layer additionally needs
//! [`AccountStore`] for registration and profile management. Both are implemented by the
//! infrastructure layer.

use async_trait::async_trait;

use crate::entities::{
    FriendRequest, Group, GroupSummary, NewGroup, NewUser, PendingFriendRequest, ProfileUpdate,
    SettingsUpdate, User,
};
use crate::error::DomainError;
use crate::value_objects::{RoomId, Snowflake};

/// Result type for directory operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Directory
// ============================================================================

#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve an authenticated user id to its account
    async fn resolve_identity(&self, user_id: Snowflake) -> RepoResult<User>;

    async fn find_group(&self, room: &RoomId) -> RepoResult<Option<Group>>;

    async fn is_member(&self, room: &RoomId, user_id: Snowflake) -> RepoResult<bool>;

    /// Groups the user belongs to, with per-user admin flag
    async fn user_groups(&self, user_id: Snowflake) -> RepoResult<Vec<GroupSummary>>;

    /// Record durable membership of a public group
    async fn join_group(&self, room: &RoomId, user_id: Snowflake) -> RepoResult<Group>;

    async fn create_group(&self, new_group: NewGroup) -> RepoResult<Group>;

    /// Add `user_id` to a group on behalf of `added_by`, who must be an admin
    async fn add_group_member(
        &self,
        room: &RoomId,
        user_id: Snowflake,
        added_by: Snowflake,
    ) -> RepoResult<Group>;

    /// Record a request from `from` to the user called `to_username`
    async fn send_friend_request(
        &self,
        from: Snowflake,
        to_username: &str,
    ) -> RepoResult<FriendRequest>;

    /// Accept a request addressed to `user_id`; both sides become friends
    async fn accept_friend_request(
        &self,
        user_id: Snowflake,
        request_id: &str,
    ) -> RepoResult<FriendRequest>;

    async fn reject_friend_request(
        &self,
        user_id: Snowflake,
        request_id: &str,
    ) -> RepoResult<FriendRequest>;

    async fn are_friends(&self, a: Snowflake, b: Snowflake) -> RepoResult<bool>;

    /// Pending requests addressed to the user
    async fn friend_requests(&self, user_id: Snowflake) -> RepoResult<Vec<PendingFriendRequest>>;

    async fn friends(&self, user_id: Snowflake) -> RepoResult<Vec<User>>;
}

// ============================================================================
// Account Store
// ============================================================================

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Register a new account; email and username must be unused
    async fn register(&self, new_user: NewUser) -> RepoResult<User>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    async fn update_profile(&self, id: Snowflake, update: ProfileUpdate) -> RepoResult<User>;

    async fn update_settings(&self, id: Snowflake, update: SettingsUpdate) -> RepoResult<User>;

    async fn public_groups(&self) -> RepoResult<Vec<GroupSummary>>;

    /// Users whose username or email contains `query`, excluding `exclude`
    async fn search_users(
        &self,
        query: &str,
        exclude: Snowflake,
        limit: usize,
    ) -> RepoResult<Vec<User>>;
}
