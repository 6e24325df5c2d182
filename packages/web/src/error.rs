//! Conversion of handler failures into HTTP responses.
//!
//! Request-level errors get a plain status page. Upstream failures are logged
//! with their cause and the visitor only sees a generic 500.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] api::Error),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The router was mounted without the session layer.
    #[error("session layer is not installed")]
    SessionLayer,

    #[error("page not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Api(e) if e.is_upstream() => {
                tracing::error!(error = %e, "upstream failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Api(api::Error::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Api(api::Error::AuthFailed) => StatusCode::UNAUTHORIZED,
            AppError::Api(api::Error::UsernameTaken | api::Error::DuplicateKey) => {
                StatusCode::CONFLICT
            }
            AppError::Api(api::Error::NotFound | api::Error::ProviderUnavailable(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Api(e) => {
                tracing::error!(error = %e, "unhandled error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Template(e) => {
                tracing::error!(error = %e, "template rendering failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::SessionLayer => {
                tracing::error!("request reached a handler without a session");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        let reason = status.canonical_reason().unwrap_or("Error");
        let body = format!(
            "<!DOCTYPE html><html><head><title>{reason}</title></head>\
             <body><h1>{} {reason}</h1><p><a href=\"/\">Back to the home page</a></p></body></html>",
            status.as_u16()
        );
        (status, Html(body)).into_response()
    }
}
