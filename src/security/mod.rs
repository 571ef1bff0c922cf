//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Page request:
//!     → session.rs (policy.rs classification, cookie.rs lookup, credential check)
//!     → pass through or redirect
//!
//! Public write request:
//!     → rate_limit.rs (per-client fixed window)
//!     → handler, or 429
//! ```
//!
//! # Design Decisions
//! - Fail closed: a credential that does not verify never grants access
//! - Rate-gate rejections are normal traffic, not errors
//! - No trust in client input; X-Forwarded-For is opt-in

pub mod cookie;
pub mod policy;
pub mod rate_limit;
pub mod session;

pub use cookie::{bearer_token, read_cookie, CookieSettings};
pub use policy::{AccessPolicy, PathClass, Requirement};
pub use rate_limit::{Admission, GateError, MemoryRateGate, RateGate, RateLimitState};
pub use session::{GuardDecision, SessionGuard};
