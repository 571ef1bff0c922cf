//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from a TOML file.
pub fn load_file(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides on top of file or default values.
///
/// Recognised variables: `JWT_SECRET`, `RATE_LIMIT_POINTS`,
/// `RATE_LIMIT_DURATION` (seconds), `APP_ENV`, `BIND_ADDRESS`, `ADMIN_PHONES`
/// (comma separated).
pub fn apply_env<F>(config: &mut GateConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = lookup("JWT_SECRET") {
        config.auth.secret = Some(secret);
    }

    if let Some(value) = lookup("RATE_LIMIT_POINTS") {
        config.rate_limit.points = value.trim().parse().map_err(|_| ConfigError::Env {
            var: "RATE_LIMIT_POINTS",
            value: value.clone(),
        })?;
    }

    if let Some(value) = lookup("RATE_LIMIT_DURATION") {
        config.rate_limit.duration_secs = value.trim().parse().map_err(|_| ConfigError::Env {
            var: "RATE_LIMIT_DURATION",
            value: value.clone(),
        })?;
    }

    if let Some(env) = lookup("APP_ENV") {
        config.server.production = env.trim().eq_ignore_ascii_case("production");
    }

    if let Some(addr) = lookup("BIND_ADDRESS") {
        config.server.bind_address = addr;
    }

    if let Some(phones) = lookup("ADMIN_PHONES") {
        config.auth.admin_phones = phones
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
    }

    Ok(())
}

/// Load configuration: optional TOML file, then process environment, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => GateConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
