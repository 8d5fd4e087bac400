//! JWT utilities for authentication
//!
//! Provides token encoding, decoding, and validation using the `jsonwebtoken` crate.

use chat_core::{Snowflake, TokenError, TokenVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Get the user ID as a Snowflake
    pub fn user_id(&self) -> Result<Snowflake, TokenError> {
        Snowflake::parse(&self.sub).map_err(|_| TokenError::Invalid)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// HS256 token issuer and verifier
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service; `token_expiry` is in seconds
    #[must_use]
    pub fn new(secret: &str, token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry,
        }
    }

    #[must_use]
    pub fn token_expiry(&self) -> i64 {
        self.token_expiry
    }

    /// Issue a token for a user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, user_id: Snowflake) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.token_expiry)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to encode JWT: {e}")))
    }

    /// Decode and validate a JWT token
    pub fn decode_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

impl TokenVerifier for JwtService {
    fn verify(&self, token: &str) -> Result<Snowflake, TokenError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        self.decode_token(token)?.user_id()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_expiry", &self.token_expiry)
            .finish_non_exhaustive()
    }
}
