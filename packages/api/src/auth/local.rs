//! Local (username + password) credential verification.

use super::password;
use crate::db::UserStore;
use crate::error::{Error, Result};
use crate::models::User;

/// Check a username/password pair and return the matching user.
///
/// Every failure is the same [`Error::AuthFailed`]: unknown username, a user
/// without a local credential, and a wrong password are indistinguishable,
/// both in the result and in the time it takes.
pub async fn verify(store: &dyn UserStore, username: &str, password: &str) -> Result<User> {
    let user = store.find_by_username(username.trim()).await?;
    let hash = user.as_ref().and_then(|u| u.password_hash.clone());

    let matched = password::verify_blocking(password.to_string(), hash).await?;

    match user {
        Some(user) if matched => Ok(user),
        _ => Err(Error::AuthFailed),
    }
}
