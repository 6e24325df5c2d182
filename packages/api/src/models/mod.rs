//! Data models for the application.

mod provider;
mod user;

pub use provider::{ExternalIdentity, Provider};
pub use user::User;
