//! Session manager: ties a principal to a tower-sessions [`Session`].
//!
//! Only the user id goes into the session. The full record is reloaded on
//! every request, and a session pointing at a user that no longer exists is
//! treated as anonymous.

use serde::{Deserialize, Serialize};
use tower_sessions::session::Error as SessionError;
use tower_sessions::Session;
use uuid::Uuid;

use crate::db::UserStore;
use crate::error::Result;
use crate::models::{Provider, User};

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Key for the handshake state kept between OAuth initiate and callback.
pub const SESSION_OAUTH_KEY: &str = "oauth_pending";

/// CSRF state and PKCE verifier of an OAuth login in progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingAuthorization {
    pub provider: Provider,
    pub state: String,
    pub verifier: String,
}

/// Establish `user` as the principal. The session id is cycled first so a
/// pre-login id can't be reused.
pub async fn login(session: &Session, user: &User) -> Result<()> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, user.id).await?;
    tracing::debug!(user_id = %user.id, "principal stored in session");
    Ok(())
}

/// Drop the principal and everything else in the session.
pub async fn logout(session: &Session) -> Result<()> {
    session.flush().await?;
    Ok(())
}

/// The user id stored in the session, if any. A value that doesn't parse as
/// an id is dropped.
pub async fn principal_id(session: &Session) -> Result<Option<Uuid>> {
    match session.get::<Uuid>(SESSION_USER_ID_KEY).await {
        Ok(id) => Ok(id),
        Err(SessionError::SerdeJson(e)) => {
            tracing::warn!(error = %e, "unreadable principal in session, continuing anonymously");
            session.remove_value(SESSION_USER_ID_KEY).await?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the current principal. Missing id or a deleted user yields `None`.
pub async fn current_user(session: &Session, store: &dyn UserStore) -> Result<Option<User>> {
    let Some(id) = principal_id(session).await? else {
        return Ok(None);
    };

    let user = store.find_by_id(id).await?;
    if user.is_none() {
        tracing::info!(user_id = %id, "session refers to a missing user, continuing anonymously");
        session.remove::<Uuid>(SESSION_USER_ID_KEY).await?;
    }
    Ok(user)
}

pub async fn save_pending(session: &Session, pending: &PendingAuthorization) -> Result<()> {
    session.insert(SESSION_OAUTH_KEY, pending).await?;
    Ok(())
}

/// Take the pending handshake out of the session. It is single use.
pub async fn take_pending(session: &Session) -> Result<Option<PendingAuthorization>> {
    Ok(session.remove(SESSION_OAUTH_KEY).await?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::db::MemoryUserStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_login_then_current_user() {
        let store = MemoryUserStore::new();
        let user = store.register("alice", "pw1").await.unwrap();
        let session = session();

        assert!(current_user(&session, &store).await.unwrap().is_none());

        login(&session, &user).await.unwrap();
        let loaded = current_user(&session, &store).await.unwrap().unwrap();
        assert_eq!(loaded.id, user.id);
    }

    #[tokio::test]
    async fn test_logout_clears_principal() {
        let store = MemoryUserStore::new();
        let user = store.register("alice", "pw1").await.unwrap();
        let session = session();

        login(&session, &user).await.unwrap();
        logout(&session).await.unwrap();
        assert!(principal_id(&session).await.unwrap().is_none());
        assert!(current_user(&session, &store).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_user_is_anonymous() {
        let store = MemoryUserStore::new();
        let session = session();
        session
            .insert(SESSION_USER_ID_KEY, Uuid::new_v4())
            .await
            .unwrap();

        assert!(current_user(&session, &store).await.unwrap().is_none());
        assert!(principal_id(&session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unparsable_id_is_anonymous() {
        let store = MemoryUserStore::new();
        let session = session();
        session
            .insert(SESSION_USER_ID_KEY, "not-a-uuid")
            .await
            .unwrap();

        assert!(current_user(&session, &store).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pending_authorization_is_single_use() {
        let session = session();
        let pending = PendingAuthorization {
            provider: Provider::Google,
            state: "state".into(),
            verifier: "verifier".into(),
        };

        save_pending(&session, &pending).await.unwrap();
        assert_eq!(take_pending(&session).await.unwrap(), Some(pending));
        assert_eq!(take_pending(&session).await.unwrap(), None);
    }
}
