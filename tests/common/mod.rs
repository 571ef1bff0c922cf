//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, Response};
use axum::Router;
use tower::ServiceExt;

use site_gate::auth::otp::{DeliveryError, OtpSender};
use site_gate::auth::{Role, SessionClaims};
use site_gate::clock::ManualClock;
use site_gate::config::GateConfig;
use site_gate::http::{build_router, AppState};
use site_gate::lifecycle::build_state_with_sender;

pub const SECRET: &str = "integration-test-secret";
pub const ADMIN_PHONE: &str = "+628100000001";

/// Captures login codes instead of sending them.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    pub fn last_code_for(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| p == phone)
            .map(|(_, code)| code.clone())
    }
}

impl OtpSender for RecordingSender {
    fn send(&self, phone: &str, code: &str) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push((phone.to_string(), code.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub clock: ManualClock,
    pub sender: Arc<RecordingSender>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut GateConfig)) -> Self {
        let mut config = GateConfig::default();
        config.auth.secret = Some(SECRET.to_string());
        config.auth.admin_phones = vec![ADMIN_PHONE.to_string()];
        adjust(&mut config);

        let clock = ManualClock::starting_now();
        let sender = Arc::new(RecordingSender::default());
        let state = build_state_with_sender(config, Arc::new(clock.clone()), sender.clone())
            .expect("state builds");

        Self { state, clock, sender }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    /// Credential signed with the app's codec.
    pub fn credential(&self, role: Role) -> String {
        let claims = SessionClaims {
            sub: uuid::Uuid::new_v4().to_string(),
            name: "Test User".into(),
            phone: "+628199999999".into(),
            role,
        };
        self.state
            .codec
            .sign(&claims, Duration::from_secs(3600))
            .unwrap()
    }
}

pub fn from_ip(ip: [u8; 4]) -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::from((ip, 40000)))
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(path: &str, credential: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, format!("token={credential}"))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, path: &str, body: serde_json::Value) -> Request<Body> {
    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    request.extensions_mut().insert(from_ip([127, 0, 0, 1]));
    request
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Value of the `token` cookie in a `Set-Cookie` response header.
pub fn set_cookie_token(response: &Response<Body>) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let first = raw.split(';').next()?;
    first.strip_prefix("token=").map(String::from)
}
