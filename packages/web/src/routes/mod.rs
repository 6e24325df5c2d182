//! Route controller. Every handler is stateless; who the visitor is comes
//! from the session on each request.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::context::AppContext;

mod auth;
mod home;
mod secrets;

/// `?error=` flag set by a redirect back to a form. A query string that
/// doesn't parse shows no banner.
#[derive(Debug, Default, Deserialize)]
pub struct Flash {
    pub error: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Query::<Flash>::try_from_uri(&parts.uri)
            .map(|Query(flash)| flash)
            .unwrap_or_default())
    }
}

pub fn router() -> Router<AppContext> {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(home::health))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/auth/{provider}", get(auth::oauth_start))
        .route("/auth/{provider}/secrets", get(auth::oauth_callback))
        .route("/secrets", get(secrets::list))
        .route("/submit", get(secrets::submit_page).post(secrets::submit))
}
