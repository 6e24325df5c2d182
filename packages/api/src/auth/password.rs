//! # Password hashing and verification — Argon2id
//!
//! - [`hash_password`] — generates a random salt via [`OsRng`], hashes the plaintext
//!   password with the default Argon2id parameters, and returns the result as a
//!   PHC-format string (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`). This string is
//!   stored in the `password_hash` column of the `users` table.
//!
//! - [`verify_password`] — parses a PHC-format hash and checks whether the provided
//!   plaintext matches. Returns `Ok(true)` on success, `Ok(false)` on mismatch, or
//!   `Err` if the stored hash is malformed. The digest comparison inside `argon2`
//!   is constant time.
//!
//! Both are CPU-bound; async callers run them through [`hash_blocking`] and
//! [`verify_blocking`] so request handling on other tasks is not stalled.

use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{Error, Result};

/// Verified in place of a real hash when the username is unknown, so both
/// failure paths take the same time.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("not-a-real-password").unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to build dummy hash, unknown-user logins will fail fast");
        String::new()
    })
});

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Hash(format!("failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| Error::Hash(format!("invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Burn the same amount of work as a real verification.
pub(crate) fn verify_dummy(password: &str) {
    let _ = verify_password(password, &DUMMY_HASH);
}

pub async fn hash_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| Error::Hash(e.to_string()))?
}

/// Verify on the blocking pool. `None` stands for "no credential on record"
/// and always fails after a dummy verification.
pub async fn verify_blocking(password: String, hash: Option<String>) -> Result<bool> {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            verify_dummy(&password);
            Ok(false)
        }
    })
    .await
    .map_err(|e| Error::Hash(e.to_string()))?
}
