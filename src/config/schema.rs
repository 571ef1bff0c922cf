//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::auth::SecretPolicy;

/// Root configuration for the site gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Credential, cookie and login settings.
    pub auth: AuthConfig,

    /// Rate gate settings for public write endpoints.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Production mode marks the session cookie `Secure`.
    pub production: bool,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            production: false,
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// How login/register pages treat an existing session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthPageCheck {
    /// Any cookie redirects away, valid or not.
    #[default]
    Presence,
    /// Only a cookie that verifies redirects away.
    Validity,
}

/// Credential and login configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Signing secret. Usually supplied through `JWT_SECRET`.
    #[serde(skip_serializing)]
    pub secret: Option<String>,

    /// Behaviour when no secret is configured.
    pub secret_policy: SecretPolicy,

    /// Credential lifetime ("7d", "12h", ...).
    pub token_ttl: String,

    /// Name of the session cookie.
    pub cookie_name: String,

    /// Cookie max-age in seconds.
    pub cookie_max_age_secs: u64,

    /// Login-page redirect behaviour.
    pub auth_page_check: AuthPageCheck,

    /// One-time code lifetime in seconds.
    pub otp_ttl_secs: u64,

    /// Failed attempts before a one-time code is burned.
    pub otp_max_attempts: u32,

    /// Phone numbers that register as administrators.
    pub admin_phones: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            secret_policy: SecretPolicy::Required,
            token_ttl: "7d".to_string(),
            cookie_name: "token".to_string(),
            cookie_max_age_secs: 7 * 24 * 60 * 60,
            auth_page_check: AuthPageCheck::Presence,
            otp_ttl_secs: 300,
            otp_max_attempts: 5,
            admin_phones: Vec::new(),
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Quota points per client per window.
    pub points: u32,

    /// Window length in seconds.
    pub duration_secs: u64,

    /// Key clients by the first `X-Forwarded-For` hop instead of the peer address.
    pub trust_forwarded_for: bool,

    /// How often closed windows are swept from memory, in seconds.
    pub purge_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            points: 10,
            duration_secs: 60,
            trust_forwarded_for: false,
            purge_interval_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
