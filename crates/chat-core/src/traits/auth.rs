//! Bearer token verification

use thiserror::Error;

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,
}

/// Verifies an opaque bearer token and yields the identity it was issued to.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Snowflake, TokenError>;
}
