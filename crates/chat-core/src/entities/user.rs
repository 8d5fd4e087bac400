//! User entity - a registered account

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Palette new accounts draw their avatar color from
pub const AVATAR_COLORS: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
];

/// Pick a random avatar color from [`AVATAR_COLORS`]
pub fn random_avatar_color() -> String {
    AVATAR_COLORS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(AVATAR_COLORS[0])
        .to_string()
}

/// Registered account. The password hash never lives on this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    /// Avatar color, `#RRGGBB`
    pub avatar: String,
    pub bio: String,
    pub settings: UserSettings,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Snowflake, username: String, email: String) -> Self {
        Self {
            id,
            username,
            email,
            avatar: random_avatar_color(),
            bio: String::new(),
            settings: UserSettings::default(),
            created_at: Utc::now(),
        }
    }

    /// Snapshot of the attributes other users see next to this user's activity
    pub fn display(&self) -> DisplayProfile {
        DisplayProfile {
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        }
    }

    /// Case-insensitive substring match on username or email
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.username.to_lowercase().contains(&query) || self.email.to_lowercase().contains(&query)
    }
}

/// Client preferences stored with the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub dark_mode: bool,
    pub notifications: bool,
    pub sound_enabled: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications: true,
            sound_enabled: true,
        }
    }
}

/// Partial settings update; absent fields keep their current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub dark_mode: Option<bool>,
    pub notifications: Option<bool>,
    pub sound_enabled: Option<bool>,
}

impl SettingsUpdate {
    pub fn apply(self, settings: &mut UserSettings) {
        if let Some(v) = self.dark_mode {
            settings.dark_mode = v;
        }
        if let Some(v) = self.notifications {
            settings.notifications = v;
        }
        if let Some(v) = self.sound_enabled {
            settings.sound_enabled = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub bio: Option<String>,
}

/// Account to be registered, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Name and avatar captured when a session authenticates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayProfile {
    pub username: String,
    pub avatar: String,
}
