//! Registration and one-time-code login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::{issue_credential, validate, with_cookie};
use crate::auth::otp::mask_phone;
use crate::http::error::AppError;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub phone: String,
    pub code: String,
}

/// Hand a fresh code to the sender. Delivery failures are logged, never returned.
fn dispatch_code(state: &AppState, phone: &str) {
    let code = state.otp.issue(phone);
    if let Err(e) = state.otp_sender.send(phone, &code) {
        tracing::warn!(phone = %mask_phone(phone), error = %e, "Login code delivery failed");
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let name = validate::name(&body.name)?;
    let phone = validate::phone(&body.phone)?;

    let user = state.users.register(&name, &phone)?;
    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    dispatch_code(&state, &phone);
    Ok((StatusCode::CREATED, Json(json!({ "user": user, "otp_sent": true }))).into_response())
}

pub async fn request_otp(
    State(state): State<AppState>,
    Json(body): Json<OtpRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let phone = validate::phone(&body.phone)?;
    if state.users.find_by_phone(&phone).is_none() {
        return Err(AppError::NotFound("user"));
    }

    dispatch_code(&state, &phone);
    Ok(Json(json!({ "otp_sent": true })))
}

pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<Response, AppError> {
    let phone = validate::phone(&body.phone)?;
    state.otp.verify(&phone, &body.code)?;

    let user = state
        .users
        .find_by_phone(&phone)
        .ok_or(AppError::NotFound("user"))?;
    let credential = issue_credential(&state, &user, "login")?;

    Ok(with_cookie(
        state.cookies.session_cookie(&credential),
        json!({ "token": credential, "user": user }),
    ))
}

pub async fn logout(State(state): State<AppState>) -> Response {
    with_cookie(state.cookies.clear_cookie(), json!({ "ok": true }))
}
