//! Request gating for a community organization's web site.
//!
//! Signed session credentials, a per-client rate gate for public write
//! endpoints, and a session guard deciding page access by path and role.

pub mod admin;
pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod site;
pub mod store;

pub use config::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
