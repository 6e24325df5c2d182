use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::password;
use crate::error::{Error, Result};
use crate::models::{ExternalIdentity, User};

/// Persistent collection of users.
///
/// Backends provide the primitive lookups and writes. `find_or_create`,
/// `register` and `update_secret` are built on top of them and behave the
/// same for every backend.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_external(&self, identity: &ExternalIdentity) -> Result<Option<User>>;

    /// Insert a new record. Fails with [`Error::DuplicateKey`] when the id,
    /// username or a provider id is already taken.
    async fn insert(&self, user: User) -> Result<User>;

    /// Overwrite a user's secret. Returns `false` if no such user exists.
    async fn set_secret(&self, id: Uuid, secret: &str) -> Result<bool>;

    /// Every non-null secret, oldest record first.
    async fn list_secrets(&self) -> Result<Vec<String>>;

    /// Return the user holding `identity`, creating it if needed.
    ///
    /// Two concurrent first logins race on the insert; the loser gets
    /// `DuplicateKey` and picks up the winner's record.
    async fn find_or_create(&self, identity: &ExternalIdentity) -> Result<User> {
        if let Some(user) = self.find_by_external(identity).await? {
            return Ok(user);
        }

        match self.insert(User::new_external(identity)).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, provider = %identity.provider, "created user from provider login");
                Ok(user)
            }
            Err(Error::DuplicateKey) => self
                .find_by_external(identity)
                .await?
                .ok_or(Error::DuplicateKey),
            Err(e) => Err(e),
        }
    }

    /// Create a local user with a freshly hashed password.
    async fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::Validation("username is required".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("password is required".to_string()));
        }

        if self.find_by_username(username).await?.is_some() {
            return Err(Error::UsernameTaken);
        }

        let hash = password::hash_blocking(password.to_string()).await?;

        match self.insert(User::new_local(username, hash)).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "registered local user");
                Ok(user)
            }
            Err(Error::DuplicateKey) => Err(Error::UsernameTaken),
            Err(e) => Err(e),
        }
    }

    async fn update_secret(&self, id: Uuid, secret: &str) -> Result<()> {
        if self.set_secret(id, secret).await? {
            Ok(())
        } else {
            Err(Error::NotFound)
        }
    }
}
