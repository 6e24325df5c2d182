//! Local registration and login, logout, and the provider handshake.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use minijinja::context;
use serde::Deserialize;
use tower_sessions::Session;

use api::auth::session as principal;
use api::auth::{local, CallbackParams};
use api::{Error, Provider};

use super::Flash;
use crate::context::AppContext;
use crate::error::AppError;
use crate::extract::CurrentUser;
use crate::views::{flash, ProviderLink};

#[derive(Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
}

fn provider_links(ctx: &AppContext) -> Vec<ProviderLink> {
    ctx.oauth.enabled().into_iter().map(ProviderLink::from).collect()
}

fn parse_provider(name: &str) -> Result<Provider, AppError> {
    name.parse().map_err(|_| AppError::NotFound)
}

pub async fn register_page(
    State(ctx): State<AppContext>,
    query: Flash,
) -> Result<Response, AppError> {
    let page = ctx.views.render(
        "register.html",
        context! {
            flash => flash(query.error.as_deref()),
            providers => provider_links(&ctx),
        },
    )?;
    Ok(page.into_response())
}

pub async fn register(
    State(ctx): State<AppContext>,
    session: Session,
    form: Result<Form<Credentials>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Ok(Form(form)) = form else {
        return Ok(Redirect::to("/register?error=invalid_input"));
    };

    match ctx.store.register(&form.username, &form.password).await {
        Ok(user) => {
            principal::login(&session, &user).await?;
            Ok(Redirect::to("/secrets"))
        }
        Err(Error::UsernameTaken) => Ok(Redirect::to("/register?error=username_taken")),
        Err(Error::Validation(reason)) => {
            tracing::debug!(%reason, "registration rejected");
            Ok(Redirect::to("/register?error=invalid_input"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_page(
    State(ctx): State<AppContext>,
    query: Flash,
) -> Result<Response, AppError> {
    let page = ctx.views.render(
        "login.html",
        context! {
            flash => flash(query.error.as_deref()),
            providers => provider_links(&ctx),
        },
    )?;
    Ok(page.into_response())
}

pub async fn login(
    State(ctx): State<AppContext>,
    session: Session,
    form: Result<Form<Credentials>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Ok(Form(form)) = form else {
        return Ok(Redirect::to("/login?error=invalid_credentials"));
    };

    match local::verify(ctx.store.as_ref(), &form.username, &form.password).await {
        Ok(user) => {
            principal::login(&session, &user).await?;
            tracing::info!(user_id = %user.id, "local login");
            Ok(Redirect::to("/secrets"))
        }
        Err(Error::AuthFailed) => {
            tracing::info!("local login failed");
            Ok(Redirect::to("/login?error=invalid_credentials"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(session: Session, CurrentUser(user): CurrentUser) -> Result<Redirect, AppError> {
    if let Some(user) = user {
        tracing::info!(user_id = %user.id, "logout");
    }
    principal::logout(&session).await?;
    Ok(Redirect::to("/"))
}

/// Send the visitor to the provider's consent screen.
pub async fn oauth_start(
    State(ctx): State<AppContext>,
    Path(provider): Path<String>,
    session: Session,
) -> Result<Redirect, AppError> {
    let provider = parse_provider(&provider)?;

    match ctx.oauth.initiate(provider) {
        Ok((url, pending)) => {
            principal::save_pending(&session, &pending).await?;
            Ok(Redirect::to(&url))
        }
        Err(Error::ProviderUnavailable(_)) => {
            Ok(Redirect::to("/login?error=provider_unavailable"))
        }
        Err(e) => Err(e.into()),
    }
}

/// The provider redirects back here with `code` and `state`.
pub async fn oauth_callback(
    State(ctx): State<AppContext>,
    Path(provider): Path<String>,
    session: Session,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Redirect, AppError> {
    let provider = parse_provider(&provider)?;
    let pending = principal::take_pending(&session).await?;

    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::warn!(%provider, %rejection, "malformed provider callback");
            return Ok(Redirect::to("/login?error=oauth_failed"));
        }
    };

    match ctx
        .oauth
        .handle_callback(provider, pending, params, ctx.store.as_ref())
        .await
    {
        Ok(user) => {
            principal::login(&session, &user).await?;
            tracing::info!(user_id = %user.id, %provider, "provider login");
            Ok(Redirect::to("/secrets"))
        }
        Err(Error::OAuth(reason)) => {
            tracing::warn!(%provider, %reason, "provider login failed");
            Ok(Redirect::to("/login?error=oauth_failed"))
        }
        Err(Error::ProviderUnavailable(_)) => {
            Ok(Redirect::to("/login?error=provider_unavailable"))
        }
        Err(e) => Err(e.into()),
    }
}
