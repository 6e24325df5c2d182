use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserStore;
use crate::error::{Error, Result};
use crate::models::{ExternalIdentity, Provider, User};

/// In-process user store with the same uniqueness rules as the `users` table.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

fn collides(existing: &User, new: &User) -> bool {
    let same = |a: &Option<String>, b: &Option<String>| matches!((a, b), (Some(a), Some(b)) if a == b);
    existing.id == new.id
        || same(&existing.username, &new.username)
        || Provider::ALL
            .iter()
            .any(|p| matches!((existing.external_id(*p), new.external_id(*p)), (Some(a), Some(b)) if a == b))
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username.as_deref() == Some(username))
            .cloned())
    }

    async fn find_by_external(&self, identity: &ExternalIdentity) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.external_id(identity.provider) == Some(identity.subject.as_str()))
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| collides(existing, &user)) {
            return Err(Error::DuplicateKey);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_secret(&self, id: Uuid, secret: &str) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.secret = Some(secret.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_secrets(&self) -> Result<Vec<String>> {
        let users = self.users.read().await;
        let mut with_secret: Vec<&User> = users.values().filter(|u| u.secret.is_some()).collect();
        with_secret.sort_by_key(|u| (u.created_at, u.id));
        Ok(with_secret
            .into_iter()
            .filter_map(|u| u.secret.clone())
            .collect())
    }
}
