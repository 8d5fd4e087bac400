//! Directory implementation - identity, group and friendship facts for the gateway

use async_trait::async_trait;
use tracing::{debug, instrument};

use chat_core::{
    Directory, DomainError, FriendRequest, Group, GroupSummary, NewGroup, PendingFriendRequest,
    RepoResult, RoomId, Snowflake, User,
};

use crate::store::InMemoryDirectory;

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn resolve_identity(&self, user_id: Snowflake) -> RepoResult<User> {
        self.data.read().user(user_id).cloned()
    }

    async fn find_group(&self, room: &RoomId) -> RepoResult<Option<Group>> {
        Ok(self.data.read().groups.get(room).cloned())
    }

    async fn is_member(&self, room: &RoomId, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .data
            .read()
            .groups
            .get(room)
            .is_some_and(|group| group.has_member(user_id)))
    }

    async fn user_groups(&self, user_id: Snowflake) -> RepoResult<Vec<GroupSummary>> {
        Ok(self
            .data
            .read()
            .groups_sorted()
            .into_iter()
            .filter(|group| group.has_member(user_id))
            .map(|group| group.summary_for(user_id))
            .collect())
    }

    #[instrument(skip(self))]
    async fn join_group(&self, room: &RoomId, user_id: Snowflake) -> RepoResult<Group> {
        let mut data = self.data.write();
        let group = data.group_mut(room)?;

        if group.is_private() && !group.has_member(user_id) {
            return Err(DomainError::PrivateGroup(room.clone()));
        }
        if group.add_member(user_id) {
            debug!(%room, %user_id, "Added group member");
        }
        Ok(group.clone())
    }

    #[instrument(skip(self, new_group), fields(name = %new_group.name))]
    async fn create_group(&self, new_group: NewGroup) -> RepoResult<Group> {
        let room = RoomId::for_group(self.ids.generate());
        let group = Group::create(room.clone(), new_group);

        self.data.write().groups.insert(room, group.clone());
        debug!(room = %group.id, "Created group");
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn add_group_member(
        &self,
        room: &RoomId,
        user_id: Snowflake,
        added_by: Snowflake,
    ) -> RepoResult<Group> {
        let mut data = self.data.write();
        data.user(user_id)?;

        let group = data.group_mut(room)?;
        if !group.is_admin(added_by) {
            return Err(DomainError::NotGroupAdmin);
        }
        group.add_member(user_id);
        Ok(group.clone())
    }

    #[instrument(skip(self))]
    async fn send_friend_request(
        &self,
        from: Snowflake,
        to_username: &str,
    ) -> RepoResult<FriendRequest> {
        let mut data = self.data.write();

        let to = data
            .find_by_username(to_username)
            .map(|user| user.id)
            .ok_or_else(|| DomainError::UsernameNotFound(to_username.to_string()))?;
        if to == from {
            return Err(DomainError::SelfFriendRequest);
        }
        if data.are_friends(from, to) {
            return Err(DomainError::AlreadyFriends);
        }

        let request = FriendRequest::new(from, to);
        data.friend_requests
            .entry(to)
            .or_default()
            .insert(request.id.clone(), request.clone());
        Ok(request)
    }

    #[instrument(skip(self))]
    async fn accept_friend_request(
        &self,
        user_id: Snowflake,
        request_id: &str,
    ) -> RepoResult<FriendRequest> {
        let mut data = self.data.write();

        let request = data
            .friend_requests
            .get_mut(&user_id)
            .and_then(|pending| pending.remove(request_id))
            .ok_or_else(|| DomainError::FriendRequestNotFound(request_id.to_string()))?;

        data.friends.entry(request.from).or_default().insert(request.to);
        data.friends.entry(request.to).or_default().insert(request.from);
        Ok(request)
    }

    #[instrument(skip(self))]
    async fn reject_friend_request(
        &self,
        user_id: Snowflake,
        request_id: &str,
    ) -> RepoResult<FriendRequest> {
        self.data
            .write()
            .friend_requests
            .get_mut(&user_id)
            .and_then(|pending| pending.remove(request_id))
            .ok_or_else(|| DomainError::FriendRequestNotFound(request_id.to_string()))
    }

    async fn are_friends(&self, a: Snowflake, b: Snowflake) -> RepoResult<bool> {
        Ok(self.data.read().are_friends(a, b))
    }

    async fn friend_requests(&self, user_id: Snowflake) -> RepoResult<Vec<PendingFriendRequest>> {
        let data = self.data.read();
        let Some(pending) = data.friend_requests.get(&user_id) else {
            return Ok(Vec::new());
        };

        let mut requests: Vec<_> = pending
            .values()
            .filter_map(|request| {
                let from = data.user(request.from).ok()?.clone();
                Some(PendingFriendRequest {
                    id: request.id.clone(),
                    from,
                    timestamp: request.created_at,
                })
            })
            .collect();
        requests.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(requests)
    }

    async fn friends(&self, user_id: Snowflake) -> RepoResult<Vec<User>> {
        let data = self.data.read();
        let mut friends: Vec<User> = data
            .friends
            .get(&user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| data.user(*id).ok().cloned())
            .collect();
        friends.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(friends)
    }
}
