//! Profile read and update.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::api::{issue_credential, validate, with_cookie};
use crate::auth::SessionClaims;
use crate::http::error::AppError;
use crate::http::extract::AuthSession;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub name: String,
}

pub async fn show(AuthSession(claims): AuthSession) -> Json<SessionClaims> {
    Json(claims)
}

/// Update the display name and reissue the credential.
///
/// The new credential takes its role from the directory, so this is where a
/// role change reaches the client.
pub async fn update(
    State(state): State<AppState>,
    AuthSession(claims): AuthSession,
    Json(body): Json<UpdateProfile>,
) -> Result<Response, AppError> {
    let name = validate::name(&body.name)?;
    let id: Uuid = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;

    let user = state.users.update_name(&id, &name)?;
    let credential = issue_credential(&state, &user, "profile_update")?;

    Ok(with_cookie(
        state.cookies.session_cookie(&credential),
        json!({ "token": credential, "user": user }),
    ))
}
