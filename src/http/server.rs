//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with page, API and admin routes
//! - Wire up middleware (tracing, timeout, body limit, request ID, metrics)
//! - Apply the session guard to pages and the rate gate to public writes
//! - Bind server to listener and shut down gracefully
//! - Sweep closed rate windows and stale login codes in the background

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::api;
use crate::auth::otp::{OtpSender, OtpStore};
use crate::auth::TokenCodec;
use crate::config::GateConfig;
use crate::http::request::{
    propagate_request_id_layer, request_span, set_request_id_layer, track_metrics,
};
use crate::security::rate_limit::rate_limit_middleware;
use crate::security::session::session_guard_middleware;
use crate::security::{CookieSettings, RateGate, RateLimitState, SessionGuard};
use crate::site;
use crate::store::{ContactInbox, UserDirectory};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GateConfig>,
    pub codec: Arc<TokenCodec>,
    pub guard: Arc<SessionGuard>,
    pub rate_gate: Arc<dyn RateGate>,
    pub users: Arc<UserDirectory>,
    pub inbox: Arc<ContactInbox>,
    pub otp: Arc<OtpStore>,
    pub otp_sender: Arc<dyn OtpSender>,
    pub cookies: CookieSettings,
    /// Lifetime of issued credentials.
    pub token_ttl: Duration,
}

/// HTTP server for the site.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = spawn_sweeper(
            self.state.clone(),
            Duration::from_secs(self.state.config.rate_limit.purge_interval_secs),
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        sweeper.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut public_writes = Router::new()
        .route("/api/auth/register", post(api::auth::register))
        .route("/api/auth/otp", post(api::auth::request_otp))
        .route("/api/contact", post(api::contact::submit));

    if config.rate_limit.enabled {
        let rate_state = RateLimitState {
            gate: state.rate_gate.clone(),
            trust_forwarded_for: config.rate_limit.trust_forwarded_for,
        };
        public_writes =
            public_writes.route_layer(middleware::from_fn_with_state(rate_state, rate_limit_middleware));
    }

    let api_routes = Router::new()
        .route("/api/auth/verify", post(api::auth::verify))
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/profile", get(api::profile::show).put(api::profile::update))
        .merge(public_writes)
        .merge(admin::setup_admin_router());

    let pages = site::pages::router().route_layer(middleware::from_fn_with_state(
        state.guard.clone(),
        session_guard_middleware,
    ));

    Router::new()
        .merge(pages)
        .merge(api_routes)
        .route("/health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(track_metrics))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(RequestBodyLimitLayer::new(config.server.max_body_bytes))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(set_request_id_layer())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

fn spawn_sweeper(state: AppState, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            state.rate_gate.purge_expired();
            state.otp.purge_expired();
            tracing::debug!(tracked_keys = state.rate_gate.tracked_keys(), "Swept rate windows");
        }
    })
}
