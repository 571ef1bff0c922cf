//! Credential signing and verification (HS256 JWT).
//!
//! # Responsibilities
//! - Wrap caller claims with `iat`/`exp` and sign them
//! - Verify signature, structure and expiry in one step
//!
//! # Design Decisions
//! - Expiry is checked against the injected [`Clock`], not by jsonwebtoken,
//!   so lifetimes are testable without sleeping
//! - Every failure collapses to `InvalidCredential`; callers never see a
//!   half-trusted credential

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};

/// Why a credential was rejected. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Signature,
    Algorithm,
    Malformed,
    Expired,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidReason::Signature => "signature mismatch",
            InvalidReason::Algorithm => "unexpected algorithm",
            InvalidReason::Malformed => "malformed payload",
            InvalidReason::Expired => "expired",
        };
        f.write_str(text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid credential: {0}")]
    InvalidCredential(InvalidReason),

    #[error("failed to sign credential")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("credential lifetime out of range")]
    Lifetime,
}

impl CodecError {
    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, CodecError::InvalidCredential(_))
    }
}

impl From<jsonwebtoken::errors::Error> for CodecError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        let reason = match err.kind() {
            ErrorKind::InvalidSignature => InvalidReason::Signature,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => InvalidReason::Algorithm,
            ErrorKind::ExpiredSignature => InvalidReason::Expired,
            _ => InvalidReason::Malformed,
        };
        CodecError::InvalidCredential(reason)
    }
}

#[derive(Serialize)]
struct OutgoingEnvelope<'a, T> {
    #[serde(flatten)]
    claims: &'a T,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct IncomingEnvelope<T> {
    #[serde(flatten)]
    claims: T,
    // Consumed here so it never leaks into flattened map claims.
    #[serde(default)]
    #[allow(dead_code)]
    iat: Option<i64>,
    exp: i64,
}

/// Signs and verifies credentials with a symmetric secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    /// Codec backed by the wall clock.
    pub fn with_system_clock(secret: &[u8]) -> Self {
        Self::new(secret, Arc::new(SystemClock))
    }

    /// Sign `claims` so that the credential expires `ttl` from now.
    pub fn sign<T: Serialize>(&self, claims: &T, ttl: Duration) -> Result<String, CodecError> {
        let iat = self.clock.now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).map_err(|_| CodecError::Lifetime)?;
        let exp = iat.checked_add(ttl).ok_or(CodecError::Lifetime)?;

        let envelope = OutgoingEnvelope { claims, iat, exp };
        encode(&Header::new(Algorithm::HS256), &envelope, &self.encoding).map_err(CodecError::Signing)
    }

    /// Verify a credential and return the claims it carries.
    pub fn verify<T: DeserializeOwned>(&self, credential: &str) -> Result<T, CodecError> {
        let data = decode::<IncomingEnvelope<T>>(credential, &self.decoding, &self.validation)?;

        if data.claims.exp <= self.clock.now().timestamp() {
            return Err(CodecError::InvalidCredential(InvalidReason::Expired));
        }
        Ok(data.claims.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::{Role, SessionClaims};
    use crate::auth::ttl::parse_ttl;
    use crate::clock::ManualClock;
    use serde_json::{json, Map, Value};

    fn codec_with_clock() -> (TokenCodec, ManualClock) {
        let clock = ManualClock::starting_now();
        let codec = TokenCodec::new(b"test-secret", Arc::new(clock.clone()));
        (codec, clock)
    }

    #[test]
    fn test_sign_then_verify_arbitrary_claims() {
        let (codec, _) = codec_with_clock();
        let mut claims = Map::new();
        claims.insert("foo".into(), json!("bar"));

        let token = codec.sign(&claims, parse_ttl("1h").unwrap()).unwrap();
        let decoded: Map<String, Value> = codec.verify(&token).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_session_claims_roundtrip() {
        let (codec, _) = codec_with_clock();
        let claims = SessionClaims {
            sub: "u-1".into(),
            name: "Ayu".into(),
            phone: "+6281200000000".into(),
            role: Role::Admin,
        };

        let token = codec.sign(&claims, Duration::from_secs(60)).unwrap();
        assert_eq!(codec.verify::<SessionClaims>(&token).unwrap(), claims);
    }

    #[test]
    fn test_expired_after_ttl() {
        let (codec, clock) = codec_with_clock();
        let token = codec.sign(&json!({"foo": "bar"}), Duration::from_secs(60)).unwrap();

        clock.advance(Duration::from_secs(59));
        assert!(codec.verify::<Map<String, Value>>(&token).is_ok());

        clock.advance(Duration::from_secs(1));
        let err = codec.verify::<Map<String, Value>>(&token).unwrap_err();
        assert!(matches!(err, CodecError::InvalidCredential(InvalidReason::Expired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (codec, clock) = codec_with_clock();
        let other = TokenCodec::new(b"another-secret", Arc::new(clock));
        let token = codec.sign(&json!({"foo": "bar"}), Duration::from_secs(60)).unwrap();

        let err = other.verify::<Map<String, Value>>(&token).unwrap_err();
        assert!(matches!(err, CodecError::InvalidCredential(InvalidReason::Signature)));
    }

    #[test]
    fn test_garbage_rejected() {
        let (codec, _) = codec_with_clock();
        let err = codec.verify::<Map<String, Value>>("not.a.jwt").unwrap_err();
        assert!(err.is_invalid_credential());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let (codec, _) = codec_with_clock();
        let claims = SessionClaims {
            sub: "u-2".into(),
            name: "Budi".into(),
            phone: "+6281300000000".into(),
            role: Role::User,
        };
        let token = codec.sign(&claims, Duration::from_secs(60)).unwrap();

        let mut forged = claims.clone();
        forged.role = Role::Admin;
        let forged_token = codec.sign(&forged, Duration::from_secs(60)).unwrap();

        // Header and signature from one token, payload from another.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged_token.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(codec.verify::<SessionClaims>(&spliced).unwrap_err().is_invalid_credential());
    }

    #[test]
    fn test_signing_is_deterministic_for_fixed_clock() {
        let (codec, _) = codec_with_clock();
        let a = codec.sign(&json!({"foo": "bar"}), Duration::from_secs(60)).unwrap();
        let b = codec.sign(&json!({"foo": "bar"}), Duration::from_secs(60)).unwrap();
        assert_eq!(a, b);
    }
}
