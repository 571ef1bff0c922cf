//! Session extractors for API handlers.
//!
//! Pages are gated by the session guard middleware and redirect. API routes
//! answer with JSON errors instead, so they verify the credential here.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::SessionClaims;
use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::security::{bearer_token, read_cookie};

/// Verified claims from `Authorization: Bearer` or the session cookie.
///
/// An explicit bearer credential is tried first. A credential that fails to
/// verify does not stop the other source from being tried.
#[derive(Debug, Clone)]
pub struct AuthSession(pub SessionClaims);

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let candidates = [
            bearer_token(&parts.headers),
            read_cookie(&parts.headers, &state.cookies.name),
        ];

        let mut rejection = AppError::Unauthorized;
        for credential in candidates.iter().flatten() {
            match state.codec.verify::<SessionClaims>(credential) {
                Ok(claims) => return Ok(AuthSession(claims)),
                Err(e) => {
                    tracing::debug!(error = %e, "Credential rejected");
                    rejection = AppError::from(e);
                }
            }
        }

        Err(rejection)
    }
}
