use axum::{response::Html, routing::get, Extension, Router};

use crate::auth::SessionClaims;
use crate::http::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login))
        .route("/register", get(register))
        .route("/profile", get(profile))
        .route("/dashboard", get(dashboard))
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title></head><body><h1>{title}</h1>{body}</body></html>"
    ))
}

/// Minimal escaping for user-supplied text placed in HTML.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

async fn home() -> Html<String> {
    page("Home", "<p>Welcome.</p>")
}

async fn login() -> Html<String> {
    page("Login", "<p>Enter your phone number to receive a login code.</p>")
}

async fn register() -> Html<String> {
    page("Register", "<p>Create an account with your name and phone number.</p>")
}

// Claims are inserted by the session guard on protected paths.
async fn profile(Extension(claims): Extension<SessionClaims>) -> Html<String> {
    page(
        "Profile",
        &format!("<p>Signed in as {}.</p>", escape(&claims.name)),
    )
}

async fn dashboard(Extension(claims): Extension<SessionClaims>) -> Html<String> {
    page(
        "Dashboard",
        &format!("<p>Administrator: {}.</p>", escape(&claims.name)),
    )
}
