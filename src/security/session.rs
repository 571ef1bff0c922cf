//! Session guard: per-request page access decisions.
//!
//! ```text
//! path → policy.classify
//!   Public     → pass
//!   AuthPage   → session cookie? redirect "/" : pass
//!   Protected  → no cookie        → redirect "/login"
//!                verify fails     → redirect "/login"
//!                role not admitted → redirect "/"
//!                otherwise        → pass (claims attached to the request)
//! ```
//!
//! The role claim is taken from the credential as-is; the directory is not consulted.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{SessionClaims, TokenCodec};
use crate::config::AuthPageCheck;
use crate::observability::metrics;
use crate::security::cookie::read_cookie;
use crate::security::policy::{AccessPolicy, PathClass};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through, with the verified claims on protected paths.
    Pass(Option<SessionClaims>),
    Redirect(&'static str),
}

#[derive(Debug)]
pub struct SessionGuard {
    policy: AccessPolicy,
    codec: Arc<TokenCodec>,
    cookie_name: String,
    auth_page_check: AuthPageCheck,
}

impl SessionGuard {
    pub fn new(
        policy: AccessPolicy,
        codec: Arc<TokenCodec>,
        cookie_name: impl Into<String>,
        auth_page_check: AuthPageCheck,
    ) -> Self {
        Self {
            policy,
            codec,
            cookie_name: cookie_name.into(),
            auth_page_check,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn evaluate(&self, path: &str, cookie: Option<&str>) -> GuardDecision {
        match self.policy.classify(path) {
            PathClass::Public => GuardDecision::Pass(None),

            PathClass::AuthPage => {
                let signed_in = match (cookie, self.auth_page_check) {
                    (None, _) => false,
                    (Some(_), AuthPageCheck::Presence) => true,
                    (Some(token), AuthPageCheck::Validity) => {
                        self.codec.verify::<SessionClaims>(token).is_ok()
                    }
                };
                if signed_in {
                    GuardDecision::Redirect(HOME_PATH)
                } else {
                    GuardDecision::Pass(None)
                }
            }

            PathClass::Protected(requirement) => {
                let Some(token) = cookie else {
                    return GuardDecision::Redirect(LOGIN_PATH);
                };

                match self.codec.verify::<SessionClaims>(token) {
                    Err(e) => {
                        tracing::debug!(path = %path, error = %e, "Session cookie rejected");
                        GuardDecision::Redirect(LOGIN_PATH)
                    }
                    Ok(claims) if !requirement.admits(claims.role) => {
                        tracing::debug!(path = %path, role = %claims.role, "Role not admitted");
                        GuardDecision::Redirect(HOME_PATH)
                    }
                    Ok(claims) => GuardDecision::Pass(Some(claims)),
                }
            }
        }
    }
}

/// Middleware applying [`SessionGuard`] to every page request.
pub async fn session_guard_middleware(
    State(guard): State<Arc<SessionGuard>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let cookie = read_cookie(request.headers(), guard.cookie_name());
    let decision = guard.evaluate(request.uri().path(), cookie.as_deref());

    match decision {
        GuardDecision::Pass(claims) => {
            metrics::record_guard_decision("pass");
            if let Some(claims) = claims {
                request.extensions_mut().insert(claims);
            }
            next.run(request).await
        }
        GuardDecision::Redirect(target) => {
            metrics::record_guard_decision("redirect");
            Redirect::to(target).into_response()
        }
    }
}
