use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use minijinja::context;

use super::Flash;
use crate::context::AppContext;
use crate::error::AppError;
use crate::extract::CurrentUser;
use crate::views::flash;

pub async fn index(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    query: Flash,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to("/secrets").into_response());
    }
    let page = ctx.views.render(
        "home.html",
        context! { flash => flash(query.error.as_deref()) },
    )?;
    Ok(page.into_response())
}

pub async fn health() -> &'static str {
    "ok"
}
