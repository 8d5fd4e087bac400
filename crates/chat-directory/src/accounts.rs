//! AccountStore implementation - registration, profiles, search

use async_trait::async_trait;
use tracing::{debug, instrument};

use chat_core::{
    AccountStore, DomainError, GroupSummary, NewUser, ProfileUpdate, RepoResult, SettingsUpdate,
    Snowflake, User,
};

use crate::store::{InMemoryDirectory, StoredUser};

#[async_trait]
impl AccountStore for InMemoryDirectory {
    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    async fn register(&self, new_user: NewUser) -> RepoResult<User> {
        let mut data = self.data.write();

        if data.find_by_email(&new_user.email).is_some() {
            return Err(DomainError::EmailAlreadyExists);
        }
        if data.find_by_username(&new_user.username).is_some() {
            return Err(DomainError::UsernameTaken);
        }

        let user = User::new(self.ids.generate(), new_user.username, new_user.email);
        data.friends.entry(user.id).or_default();
        data.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: new_user.password_hash,
            },
        );

        debug!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.data.read().user(id).ok().cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.data.read().find_by_email(email).cloned())
    }

    async fn password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self
            .data
            .read()
            .users
            .get(&id)
            .map(|stored| stored.password_hash.clone()))
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, id: Snowflake, update: ProfileUpdate) -> RepoResult<User> {
        let mut data = self.data.write();

        if let Some(username) = update.username.as_deref() {
            if let Some(existing) = data.find_by_username(username) {
                if existing.id != id {
                    return Err(DomainError::UsernameTaken);
                }
            }
        }

        let stored = data
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        if let Some(username) = update.username {
            stored.user.username = username;
        }
        if let Some(bio) = update.bio {
            stored.user.bio = bio;
        }
        Ok(stored.user.clone())
    }

    async fn update_settings(&self, id: Snowflake, update: SettingsUpdate) -> RepoResult<User> {
        let mut data = self.data.write();
        let stored = data
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        update.apply(&mut stored.user.settings);
        Ok(stored.user.clone())
    }

    async fn public_groups(&self) -> RepoResult<Vec<GroupSummary>> {
        Ok(self
            .data
            .read()
            .groups_sorted()
            .into_iter()
            .filter(|group| !group.is_private())
            .map(chat_core::Group::summary)
            .collect())
    }

    async fn search_users(
        &self,
        query: &str,
        exclude: Snowflake,
        limit: usize,
    ) -> RepoResult<Vec<User>> {
        let data = self.data.read();
        let mut results: Vec<User> = data
            .users
            .values()
            .map(|stored| &stored.user)
            .filter(|user| user.id != exclude && user.matches(query))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.username.cmp(&b.username));
        results.truncate(limit);
        Ok(results)
    }
}
