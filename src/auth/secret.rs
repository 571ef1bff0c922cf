//! Signing-secret resolution.
//!
//! Two behaviours exist in the wild: refuse to start without a secret, or
//! fall back to a fixed development secret. Both are selectable through
//! `auth.secret_policy`; `required` is the default.

use serde::{Deserialize, Serialize};

/// Secret used when the policy is `fallback` and none is configured.
pub const FALLBACK_SECRET: &str = "site-gate-development-secret";

/// What to do when no signing secret is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecretPolicy {
    /// Abort startup.
    #[default]
    Required,
    /// Use [`FALLBACK_SECRET`] and warn.
    Fallback,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("JWT_SECRET is not set and auth.secret_policy is \"required\"")]
    Missing,
}

/// Pick the signing secret according to `policy`.
pub fn resolve_secret(configured: Option<&str>, policy: SecretPolicy) -> Result<String, SecretError> {
    match configured.map(str::trim).filter(|s| !s.is_empty()) {
        Some(secret) => Ok(secret.to_string()),
        None => match policy {
            SecretPolicy::Required => Err(SecretError::Missing),
            SecretPolicy::Fallback => {
                tracing::warn!("No signing secret configured, using the built-in fallback secret");
                Ok(FALLBACK_SECRET.to_string())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_secret_wins() {
        assert_eq!(
            resolve_secret(Some("s3cret"), SecretPolicy::Required).unwrap(),
            "s3cret"
        );
        assert_eq!(
            resolve_secret(Some("s3cret"), SecretPolicy::Fallback).unwrap(),
            "s3cret"
        );
    }

    #[test]
    fn test_required_policy_fails_without_secret() {
        assert_eq!(resolve_secret(None, SecretPolicy::Required), Err(SecretError::Missing));
        assert_eq!(resolve_secret(Some("  "), SecretPolicy::Required), Err(SecretError::Missing));
    }

    #[test]
    fn test_fallback_policy_substitutes_constant() {
        assert_eq!(resolve_secret(None, SecretPolicy::Fallback).unwrap(), FALLBACK_SECRET);
    }
}
