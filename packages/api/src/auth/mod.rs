//! Authentication: local credentials, OAuth providers and the session principal.

mod config;
pub mod local;
mod oauth;
pub mod password;
pub mod session;

pub use config::{Endpoints, OAuthConfig};
pub use oauth::{CallbackParams, OAuthBridge};
pub use password::{hash_password, verify_password};
pub use session::{PendingAuthorization, SESSION_OAUTH_KEY, SESSION_USER_ID_KEY};
