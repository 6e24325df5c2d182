//! # User model
//!
//! [`User`] is the complete row of the `users` table:
//!
//! - `id` — primary key (`UUID v4`), generated by the application and never changed.
//! - `username` / `password_hash` — the local credential. Both are `None` for users
//!   who only ever signed in through a provider.
//! - `google_id` / `facebook_id` — one optional subject id per provider.
//! - `secret` — the text the user chose to share. Only users with a secret show up
//!   on the public list.
//! - `created_at` / `updated_at` — audit timestamps.
//!
//! The password hash is left out of the `Debug` output so a user can be logged safely.

use std::fmt;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{ExternalIdentity, Provider};

/// Full user record from the database.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub secret: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    fn blank() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: None,
            password_hash: None,
            google_id: None,
            facebook_id: None,
            secret: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A fresh record with a local credential.
    pub fn new_local(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password_hash: Some(password_hash.into()),
            ..Self::blank()
        }
    }

    /// A fresh record carrying only the given provider id. Every other
    /// provider column stays null so identities never collide.
    pub fn new_external(identity: &ExternalIdentity) -> Self {
        let mut user = Self::blank();
        match identity.provider {
            Provider::Google => user.google_id = Some(identity.subject.clone()),
            Provider::Facebook => user.facebook_id = Some(identity.subject.clone()),
        }
        user
    }

    pub fn external_id(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Google => self.google_id.as_deref(),
            Provider::Facebook => self.facebook_id.as_deref(),
        }
    }

    /// Display name, falling back to the provider the user signed in with.
    pub fn display_name(&self) -> &str {
        if let Some(username) = self.username.as_deref() {
            return username;
        }
        Provider::ALL
            .into_iter()
            .find(|p| self.external_id(*p).is_some())
            .map(|p| p.label())
            .unwrap_or("anonymous")
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("google_id", &self.google_id)
            .field("facebook_id", &self.facebook_id)
            .field("has_secret", &self.secret.is_some())
            .finish()
    }
}
