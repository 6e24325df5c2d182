//! Error taxonomy shared by the user store, the credential authenticator and
//! the OAuth bridge.
//!
//! Variants fall in two groups. [`Error::Validation`], [`Error::UsernameTaken`],
//! [`Error::AuthFailed`] and [`Error::NotFound`] describe the request itself and
//! are turned into a redirect back to the originating form by the web layer.
//! Everything else is an upstream failure: it is logged and the visitor only
//! sees a generic error page.

use thiserror::Error;

use crate::models::Provider;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed user input (blank username, blank password, ...).
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("username is already taken")]
    UsernameTaken,

    /// Credential mismatch. Never says whether the username or the password was wrong.
    #[error("invalid username or password")]
    AuthFailed,

    #[error("user not found")]
    NotFound,

    /// A uniqueness constraint rejected an insert.
    #[error("duplicate key")]
    DuplicateKey,

    #[error("{0} login is not configured")]
    ProviderUnavailable(Provider),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("oauth error: {0}")]
    OAuth(String),

    #[error("password hashing error: {0}")]
    Hash(String),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Error::DuplicateKey,
            _ => Error::Database(err),
        }
    }
}

impl Error {
    /// True for failures of a collaborator (database, session store, identity
    /// provider, hasher) rather than of the request.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Database(_)
                | Error::Migrate(_)
                | Error::Session(_)
                | Error::OAuth(_)
                | Error::Hash(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_errors_are_not_upstream() {
        assert!(!Error::Validation("blank".into()).is_upstream());
        assert!(!Error::UsernameTaken.is_upstream());
        assert!(!Error::AuthFailed.is_upstream());
        assert!(!Error::NotFound.is_upstream());
        assert!(Error::OAuth("token exchange failed".into()).is_upstream());
        assert!(Error::Hash("bad salt".into()).is_upstream());
    }

    #[test]
    fn test_auth_failed_message_is_generic() {
        assert_eq!(Error::AuthFailed.to_string(), "invalid username or password");
    }

    #[test]
    fn test_row_not_found_is_a_database_error() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::Database(_)));
    }
}
