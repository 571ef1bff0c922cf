//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, shared layers)
//!     → request.rs (request ID, span, metrics)
//!     → page routes: security::session guard → site pages
//!     → API routes: [rate gate] → extract.rs (session) → api / admin handlers
//!     → error.rs (map failures to status + JSON)
//!     → Send to client
//! ```

pub mod error;
pub mod extract;
pub mod request;
pub mod server;

pub use error::AppError;
pub use extract::AuthSession;
pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};
