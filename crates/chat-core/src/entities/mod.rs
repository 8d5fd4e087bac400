//! Domain entities - core business objects

mod friend;
mod group;
mod message;
mod user;

pub use friend::{FriendRequest, PendingFriendRequest};
pub use group::{Group, GroupKind, GroupSummary, NewGroup};
pub use message::ChatMessage;
pub use user::{
    random_avatar_color, DisplayProfile, NewUser, ProfileUpdate, SettingsUpdate, User,
    UserSettings, AVATAR_COLORS,
};
