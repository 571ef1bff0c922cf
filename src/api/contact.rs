//! Public contact form.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::validate;
use crate::http::error::AppError;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
    pub message: String,
}

pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let name = validate::name(&body.name)?;
    let phone = validate::phone(&body.phone)?;
    let message = validate::message(&body.message)?;

    let entry = state.inbox.push(&name, &phone, &message);
    tracing::info!(message_id = %entry.id, "Contact message received");

    Ok((StatusCode::CREATED, Json(json!({ "id": entry.id }))))
}
