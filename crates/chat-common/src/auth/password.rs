//! Password hashing and verification utilities
//!
//! Argon2id with a random salt per hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AppError, AppResult};

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a hash
///
/// # Errors
/// Returns an error if verification fails or the hash is invalid
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Check a password against a stored hash, mapping a mismatch to `InvalidCredentials`
///
/// # Errors
/// Returns `AppError::InvalidCredentials` if the password doesn't match
pub fn verify_credentials(password: &str, hash: &str) -> AppResult<()> {
    if verify_password(password, hash)? {
        Ok(())
    } else {
        Err(AppError::InvalidCredentials)
    }
}
