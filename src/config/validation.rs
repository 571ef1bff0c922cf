//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (quota > 0, window > 0, parsable TTL)
//! - Validate addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - The signing secret is resolved separately, see `auth::secret`

use std::net::SocketAddr;

use crate::auth::parse_ttl;
use crate::config::schema::GateConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("{:?} is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than zero"));
    }

    if let Err(e) = parse_ttl(&config.auth.token_ttl) {
        errors.push(ValidationError::new("auth.token_ttl", e.to_string()));
    }
    if config.auth.cookie_name.is_empty()
        || config.auth.cookie_name.contains(|c: char| c == '=' || c == ';' || c.is_whitespace())
    {
        errors.push(ValidationError::new("auth.cookie_name", "must be a non-empty cookie token"));
    }
    if config.auth.otp_ttl_secs == 0 {
        errors.push(ValidationError::new("auth.otp_ttl_secs", "must be greater than zero"));
    }
    if config.auth.otp_max_attempts == 0 {
        errors.push(ValidationError::new("auth.otp_max_attempts", "must be greater than zero"));
    }

    if config.rate_limit.points == 0 {
        errors.push(ValidationError::new("rate_limit.points", "must be greater than zero"));
    }
    if config.rate_limit.duration_secs == 0 {
        errors.push(ValidationError::new("rate_limit.duration_secs", "must be greater than zero"));
    }
    if config.rate_limit.purge_interval_secs == 0 {
        errors.push(ValidationError::new("rate_limit.purge_interval_secs", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
