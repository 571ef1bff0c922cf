//! Credential subsystem.
//!
//! # Data Flow
//! ```text
//! Login:
//!     phone → otp.rs (issue code, hand to sender)
//!     phone + code → otp.rs (verify, single use)
//!     → claims.rs (SessionClaims from directory user)
//!     → codec.rs (sign with ttl.rs lifetime)
//!     → cookie / bearer token to client
//!
//! Every gated request:
//!     cookie or bearer → codec.rs (verify signature + expiry) → SessionClaims
//! ```
//!
//! # Design Decisions
//! - Credentials are stateless: nothing is stored server-side, no revocation list
//! - The role claim is trusted until expiry; a profile update reissues it
//! - The signing secret comes from configuration, resolved by secret.rs

pub mod claims;
pub mod codec;
pub mod otp;
pub mod secret;
pub mod ttl;

pub use claims::{Role, SessionClaims};
pub use codec::{CodecError, TokenCodec};
pub use secret::{resolve_secret, SecretPolicy};
pub use ttl::parse_ttl;
