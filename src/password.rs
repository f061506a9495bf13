//! Password hashing

use crate::error::{Error, Result};

/// Hash a plaintext password with bcrypt at the given cost
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a plaintext password against a stored bcrypt hash.
///
/// bcrypt compares digests in constant time. A malformed stored hash counts
/// as a mismatch so that callers never reveal why a login failed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// `hash_password` on the blocking pool
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| Error::Internal(format!("failed to hash password: {}", e)))?
}

/// `verify_password` on the blocking pool
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal(format!("failed to verify password: {}", e)))
}
