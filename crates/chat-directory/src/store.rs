//! Shared state behind the in-memory directory

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use chat_core::{
    DomainError, FriendRequest, Group, RepoResult, RoomId, Snowflake, SnowflakeGenerator, User,
};

/// Account plus the credential that never leaves the directory
#[derive(Debug, Clone)]
pub(crate) struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Default)]
pub(crate) struct DirectoryData {
    pub users: HashMap<Snowflake, StoredUser>,
    pub groups: HashMap<RoomId, Group>,
    /// Pending requests keyed by recipient, then request id
    pub friend_requests: HashMap<Snowflake, HashMap<String, FriendRequest>>,
    pub friends: HashMap<Snowflake, HashSet<Snowflake>>,
}

impl DirectoryData {
    pub fn user(&self, id: Snowflake) -> RepoResult<&User> {
        self.users
            .get(&id)
            .map(|stored| &stored.user)
            .ok_or(DomainError::UserNotFound(id))
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .values()
            .map(|stored| &stored.user)
            .find(|user| user.email.eq_ignore_ascii_case(email))
    }

    /// Usernames are unique ignoring case
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        let username = username.to_lowercase();
        self.users
            .values()
            .map(|stored| &stored.user)
            .find(|user| user.username.to_lowercase() == username)
    }

    pub fn group_mut(&mut self, room: &RoomId) -> RepoResult<&mut Group> {
        self.groups
            .get_mut(room)
            .ok_or_else(|| DomainError::GroupNotFound(room.clone()))
    }

    /// Groups ordered oldest first
    pub fn groups_sorted(&self) -> Vec<&Group> {
        let mut groups: Vec<_> = self.groups.values().collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        groups
    }

    pub fn are_friends(&self, a: Snowflake, b: Snowflake) -> bool {
        self.friends.get(&a).is_some_and(|set| set.contains(&b))
    }
}

/// In-memory directory. Cheap to share behind an `Arc`; every call takes the lock once
/// and never holds it across an await point.
pub struct InMemoryDirectory {
    pub(crate) data: RwLock<DirectoryData>,
    pub(crate) ids: Arc<SnowflakeGenerator>,
}

impl InMemoryDirectory {
    /// Create a directory seeded with the public `general` group
    pub fn new(ids: Arc<SnowflakeGenerator>) -> Self {
        let mut data = DirectoryData::default();
        let general = Group::general();
        data.groups.insert(general.id.clone(), general);

        Self {
            data: RwLock::new(data),
            ids,
        }
    }

    pub fn user_count(&self) -> usize {
        self.data.read().users.len()
    }

    pub fn group_count(&self) -> usize {
        self.data.read().groups.len()
    }
}

impl std::fmt::Debug for InMemoryDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data.read();
        f.debug_struct("InMemoryDirectory")
            .field("users", &data.users.len())
            .field("groups", &data.groups.len())
            .finish_non_exhaustive()
    }
}
