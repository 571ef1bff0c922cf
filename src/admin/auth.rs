use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::SessionClaims;
use crate::http::error::AppError;
use crate::http::extract::AuthSession;
use crate::http::server::AppState;

/// A verified session whose role claim is `ADMIN`.
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionClaims);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthSession(claims) = AuthSession::from_request_parts(parts, state).await?;

        if !claims.is_admin() {
            tracing::warn!(user_id = %claims.sub, role = %claims.role, "Admin API refused");
            return Err(AppError::Forbidden);
        }
        Ok(AdminSession(claims))
    }
}
