//! JSON API handlers.
//!
//! # Routes
//! - `auth`: register, request code, verify code (issues credential), logout
//! - `profile`: read claims, update name (reissues credential)
//! - `contact`: public contact form
//!
//! Register, code requests and contact submissions sit behind the rate gate.

pub mod auth;
pub mod contact;
pub mod profile;
pub mod validate;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::User;

/// Sign a credential for `user` with the configured lifetime.
pub(crate) fn issue_credential(
    state: &AppState,
    user: &User,
    reason: &'static str,
) -> Result<String, AppError> {
    let credential = state.codec.sign(&user.claims(), state.token_ttl)?;
    metrics::record_credential_issued(reason);
    tracing::info!(user_id = %user.id, role = %user.role, reason, "Credential issued");
    Ok(credential)
}

/// JSON body plus a `Set-Cookie` header.
pub(crate) fn with_cookie(cookie: String, body: Value) -> Response {
    ([(header::SET_COOKIE, cookie)], Json(body)).into_response()
}
