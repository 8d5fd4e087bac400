//! Traits (ports) the infrastructure layer implements

mod auth;
mod directory;

pub use auth::{TokenError, TokenVerifier};
pub use directory::{AccountStore, Directory, RepoResult};
