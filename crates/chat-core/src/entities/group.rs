//! Group entity - the durable record behind every chat room

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::value_objects::{RoomId, Snowflake};

/// Visibility of a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    #[default]
    Public,
    Private,
}

/// Group record owned by the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: RoomId,
    pub name: String,
    pub description: String,
    pub kind: GroupKind,
    /// `None` for system-owned groups such as `general`
    pub creator: Option<Snowflake>,
    pub members: Vec<Snowflake>,
    pub admins: Vec<Snowflake>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// The well-known public room, owned by the system
    pub fn general() -> Self {
        Self {
            id: RoomId::general(),
            name: "General".to_string(),
            description: "General discussion room".to_string(),
            kind: GroupKind::Public,
            creator: None,
            members: Vec::new(),
            admins: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Build a group created by a user; the creator is its first member and admin
    pub fn create(id: RoomId, new_group: NewGroup) -> Self {
        Self {
            id,
            name: new_group.name,
            description: new_group.description,
            kind: new_group.kind,
            creator: Some(new_group.creator),
            members: vec![new_group.creator],
            admins: vec![new_group.creator],
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        self.kind == GroupKind::Private
    }

    pub fn has_member(&self, user_id: Snowflake) -> bool {
        self.members.contains(&user_id)
    }

    pub fn is_admin(&self, user_id: Snowflake) -> bool {
        self.admins.contains(&user_id)
    }

    /// Returns false if the user was already a member
    pub fn add_member(&mut self, user_id: Snowflake) -> bool {
        if self.has_member(user_id) {
            return false;
        }
        self.members.push(user_id);
        true
    }

    /// Summary without a per-viewer admin flag
    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind,
            member_count: self.members.len(),
            is_admin: None,
            created_at: self.created_at,
        }
    }

    /// Summary as seen by `viewer`
    pub fn summary_for(&self, viewer: Snowflake) -> GroupSummary {
        GroupSummary {
            is_admin: Some(self.is_admin(viewer)),
            ..self.summary()
        }
    }
}

/// Group as listed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: RoomId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: GroupKind,
    pub member_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Request to create a group
#[derive(Debug, Clone, Validate)]
pub struct NewGroup {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
    pub kind: GroupKind,
    pub creator: Snowflake,
}
