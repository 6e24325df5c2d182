//! # Web crate — HTTP surface of Secrets
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `context` | [`AppContext`]: user store, OAuth bridge and views shared by all handlers |
//! | `extract` | [`CurrentUser`] extractor resolving the session principal |
//! | `routes` | axum handlers for pages, forms and the provider handshake |
//! | `views` | minijinja templates |
//!
//! [`app`] wraps the router with the session and trace layers; `main.rs`
//! only wires configuration, the database and the listener.

use std::path::Path;

use axum::Router;
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use api::settings::SessionSettings;

mod context;
mod error;
mod extract;
mod routes;
mod views;

pub use context::AppContext;
pub use error::AppError;
pub use extract::CurrentUser;

/// Routes plus static files from `assets`. Expects a session layer on top.
pub fn router(ctx: AppContext, assets: impl AsRef<Path>) -> Router {
    routes::router()
        .fallback_service(ServeDir::new(assets))
        .with_state(ctx)
}

/// The complete application: routes, sessions in `store`, request tracing.
pub fn app<S>(
    ctx: AppContext,
    store: S,
    settings: &SessionSettings,
    assets: impl AsRef<Path>,
) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = SessionManagerLayer::new(store)
        .with_secure(settings.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(settings.days)));

    router(ctx, assets)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}
