//! Fixed-window rate gate for public write endpoints.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::clock::Clock;
use crate::config::RateLimitConfig;
use crate::http::error::AppError;
use crate::observability::metrics;

/// Outcome of consuming one quota point. A rejection is normal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Granted { remaining: u32 },
    Rejected { retry_after: Duration },
}

impl Admission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Admission::Granted { .. })
    }
}

/// The gate itself failed, as opposed to refusing the request.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("rate gate backend unavailable: {0}")]
    Backend(String),
}

/// Per-key quota tracker.
pub trait RateGate: Send + Sync {
    /// Consume one point for `key`.
    fn consume(&self, key: &str) -> Result<Admission, GateError>;

    /// Forget windows that have closed.
    fn purge_expired(&self);

    /// Number of keys with an open window.
    fn tracked_keys(&self) -> usize;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    consumed: u32,
    closes_at: DateTime<Utc>,
}

/// Process-local fixed-window counter. Lost on restart.
pub struct MemoryRateGate {
    windows: DashMap<String, Window>,
    points: u32,
    duration: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryRateGate {
    pub fn new(points: u32, duration: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            points,
            duration: chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX),
            clock,
        }
    }

    pub fn from_config(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config.points, Duration::from_secs(config.duration_secs), clock)
    }

    fn open_window(&self, now: DateTime<Utc>) -> Window {
        Window {
            consumed: 0,
            closes_at: now.checked_add_signed(self.duration).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

impl RateGate for MemoryRateGate {
    fn consume(&self, key: &str) -> Result<Admission, GateError> {
        let now = self.clock.now();

        // The entry guard holds the shard lock, so consumes for one key are serialized.
        let mut window = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| self.open_window(now));

        if window.closes_at <= now {
            *window = self.open_window(now);
        }

        window.consumed = window.consumed.saturating_add(1);

        if window.consumed <= self.points {
            Ok(Admission::Granted {
                remaining: self.points - window.consumed,
            })
        } else {
            let retry_after = (window.closes_at - now).to_std().unwrap_or_default();
            Ok(Admission::Rejected { retry_after })
        }
    }

    fn purge_expired(&self) {
        let now = self.clock.now();
        self.windows.retain(|_, w| w.closes_at > now);
    }

    fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

/// State for [`rate_limit_middleware`].
#[derive(Clone)]
pub struct RateLimitState {
    pub gate: Arc<dyn RateGate>,
    pub trust_forwarded_for: bool,
}

/// Key a request by client address.
pub fn client_key(request: &Request<Body>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware gating a route behind the rate gate.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&request, state.trust_forwarded_for);

    match state.gate.consume(&key) {
        Ok(Admission::Granted { remaining }) => {
            let mut response = next.run(request).await;
            response
                .headers_mut()
                .insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        Ok(Admission::Rejected { retry_after }) => {
            tracing::warn!(client = %key, retry_after_ms = retry_after.as_millis() as u64, "Rate limit exceeded");
            metrics::record_rate_limited();
            AppError::TooManyRequests { retry_after }.into_response()
        }
        Err(e) => AppError::Internal(e.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn gate(points: u32, secs: u64) -> (MemoryRateGate, ManualClock) {
        let clock = ManualClock::starting_now();
        let gate = MemoryRateGate::new(points, Duration::from_secs(secs), Arc::new(clock.clone()));
        (gate, clock)
    }

    #[test]
    fn test_three_points_then_reject() {
        let (gate, _) = gate(3, 60);

        for expected_remaining in [2, 1, 0] {
            assert_eq!(
                gate.consume("127.0.0.1").unwrap(),
                Admission::Granted { remaining: expected_remaining }
            );
        }
        assert!(!gate.consume("127.0.0.1").unwrap().is_granted());
    }

    #[test]
    fn test_window_resets() {
        let (gate, clock) = gate(2, 60);
        gate.consume("k").unwrap();
        gate.consume("k").unwrap();

        clock.advance(Duration::from_secs(20));
        match gate.consume("k").unwrap() {
            Admission::Rejected { retry_after } => assert_eq!(retry_after, Duration::from_secs(40)),
            other => panic!("expected rejection, got {other:?}"),
        }

        clock.advance(Duration::from_secs(40));
        assert_eq!(gate.consume("k").unwrap(), Admission::Granted { remaining: 1 });
    }

    #[test]
    fn test_keys_are_independent() {
        let (gate, _) = gate(1, 60);
        assert!(gate.consume("a").unwrap().is_granted());
        assert!(!gate.consume("a").unwrap().is_granted());
        assert!(gate.consume("b").unwrap().is_granted());
    }

    #[test]
    fn test_purge_drops_closed_windows() {
        let (gate, clock) = gate(5, 10);
        gate.consume("old").unwrap();
        clock.advance(Duration::from_secs(10));
        gate.consume("new").unwrap();

        gate.purge_expired();
        assert_eq!(gate.tracked_keys(), 1);
    }

    #[test]
    fn test_client_key_sources() {
        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 5000))));

        assert_eq!(client_key(&request, true), "203.0.113.7");
        assert_eq!(client_key(&request, false), "127.0.0.1");
    }

    struct UnavailableGate;

    impl RateGate for UnavailableGate {
        fn consume(&self, _key: &str) -> Result<Admission, GateError> {
            Err(GateError::Backend("counter store offline".into()))
        }

        fn purge_expired(&self) {}

        fn tracked_keys(&self) -> usize {
            0
        }
    }

    #[tokio::test]
    async fn test_gate_failure_is_internal_error_not_rejection() {
        use axum::http::{header, StatusCode};
        use axum::routing::post;
        use axum::Router;
        use tower::ServiceExt;

        let state = RateLimitState {
            gate: Arc::new(UnavailableGate),
            trust_forwarded_for: false,
        };
        let app = Router::new()
            .route("/api/contact", post(|| async { "stored" }))
            .route_layer(axum::middleware::from_fn_with_state(state, rate_limit_middleware));

        let request = Request::builder()
            .method("POST")
            .uri("/api/contact")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], crate::http::error::INTERNAL_MESSAGE);
    }

    #[test]
    fn test_concurrent_consumes_respect_quota() {
        let (gate, _) = gate(50, 60);
        let gate = Arc::new(gate);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                std::thread::spawn(move || {
                    (0..20)
                        .filter(|_| gate.consume("shared").unwrap().is_granted())
                        .count()
                })
            })
            .collect();

        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 50);
    }
}
