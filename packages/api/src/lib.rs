//! # API crate — users, credentials and identity providers
//!
//! Everything the web layer needs to know who a visitor is, with no HTTP
//! routing of its own.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Local credential check, OAuth bridge for Google and Facebook, session manager, password hashing |
//! | [`db`] | [`db::UserStore`] trait with PostgreSQL and in-memory backends, pool and migrations |
//! | [`error`] | Shared error taxonomy |
//! | [`models`] | `User`, `Provider` and `ExternalIdentity` |
//! | [`settings`] | Layered configuration (defaults, `config.toml`, environment) |

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod settings;

pub use error::{Error, Result};
pub use models::{ExternalIdentity, Provider, User};
pub use settings::Settings;
