//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the signing secret under the configured policy
//! - Initialize subsystems in dependency order: clock, codec, guard, stores, gate
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound by the caller, after state is ready

use std::sync::Arc;
use std::time::Duration;

use crate::auth::otp::{LogOtpSender, OtpSender, OtpStore};
use crate::auth::secret::SecretError;
use crate::auth::ttl::TtlError;
use crate::auth::{parse_ttl, resolve_secret, TokenCodec};
use crate::clock::Clock;
use crate::config::GateConfig;
use crate::http::server::AppState;
use crate::security::{AccessPolicy, CookieSettings, MemoryRateGate, SessionGuard};
use crate::store::{ContactInbox, UserDirectory};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error("auth.token_ttl: {0}")]
    TokenTtl(#[from] TtlError),
}

/// Build application state with the log-only code sender.
pub fn build_state(config: GateConfig, clock: Arc<dyn Clock>) -> Result<AppState, StartupError> {
    build_state_with_sender(config, clock, Arc::new(LogOtpSender))
}

pub fn build_state_with_sender(
    config: GateConfig,
    clock: Arc<dyn Clock>,
    otp_sender: Arc<dyn OtpSender>,
) -> Result<AppState, StartupError> {
    let secret = resolve_secret(config.auth.secret.as_deref(), config.auth.secret_policy)?;
    let token_ttl = parse_ttl(&config.auth.token_ttl)?;

    let codec = Arc::new(TokenCodec::new(secret.as_bytes(), clock.clone()));
    let guard = Arc::new(SessionGuard::new(
        AccessPolicy::site_default(),
        codec.clone(),
        config.auth.cookie_name.clone(),
        config.auth.auth_page_check,
    ));
    let rate_gate = Arc::new(MemoryRateGate::from_config(&config.rate_limit, clock.clone()));
    let otp = Arc::new(OtpStore::new(
        Duration::from_secs(config.auth.otp_ttl_secs),
        config.auth.otp_max_attempts,
        clock,
    ));

    tracing::info!(
        points = config.rate_limit.points,
        window_secs = config.rate_limit.duration_secs,
        token_ttl_secs = token_ttl.as_secs(),
        auth_page_check = ?config.auth.auth_page_check,
        "Subsystems initialized"
    );

    Ok(AppState {
        cookies: CookieSettings::from_config(&config),
        users: Arc::new(UserDirectory::new(config.auth.admin_phones.clone())),
        inbox: Arc::new(ContactInbox::new()),
        config: Arc::new(config),
        codec,
        guard,
        rate_gate,
        otp,
        otp_sender,
        token_ttl,
    })
}
