use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use minijinja::context;
use serde::Deserialize;
use tower_sessions::Session;

use api::auth::session as principal;

use super::Flash;
use crate::context::AppContext;
use crate::error::AppError;
use crate::extract::CurrentUser;
use crate::views::flash;

#[derive(Debug, Deserialize)]
pub struct SecretForm {
    secret: String,
}

/// Public list of every shared secret.
pub async fn list(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let secrets = ctx.store.list_secrets().await?;
    let page = ctx.views.render(
        "secrets.html",
        context! { secrets => secrets, authenticated => user.is_some() },
    )?;
    Ok(page.into_response())
}

pub async fn submit_page(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    query: Flash,
) -> Result<Response, AppError> {
    let Some(user) = user else {
        return Ok(Redirect::to("/login").into_response());
    };
    let page = ctx.views.render(
        "submit.html",
        context! {
            flash => flash(query.error.as_deref()),
            name => user.display_name(),
        },
    )?;
    Ok(page.into_response())
}

pub async fn submit(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    session: Session,
    form: Result<Form<SecretForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Some(user) = user else {
        return Ok(Redirect::to("/login"));
    };

    let secret = match form {
        Ok(Form(form)) if !form.secret.trim().is_empty() => form.secret,
        _ => return Ok(Redirect::to("/submit?error=empty_secret")),
    };

    match ctx.store.update_secret(user.id, &secret).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, "secret updated");
            Ok(Redirect::to("/secrets"))
        }
        Err(api::Error::NotFound) => {
            principal::logout(&session).await?;
            Ok(Redirect::to("/login"))
        }
        Err(e) => Err(e.into()),
    }
}
