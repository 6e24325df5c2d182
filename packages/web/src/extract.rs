use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use api::auth::session as principal;
use api::User;

use crate::context::AppContext;
use crate::error::AppError;

/// The logged-in user, or `None` for an anonymous visitor.
pub struct CurrentUser(pub Option<User>);

impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, ctx)
            .await
            .map_err(|_| AppError::SessionLayer)?;
        let user = principal::current_user(&session, ctx.store.as_ref()).await?;
        Ok(CurrentUser(user))
    }
}
