//! Page access through the session guard.

use std::time::Duration;

use axum::http::StatusCode;
use site_gate::auth::Role;
use site_gate::config::AuthPageCheck;

mod common;
use common::*;

#[tokio::test]
async fn test_dashboard_without_cookie_redirects_to_login() {
    let app = TestApp::new();
    let response = app.send(get("/dashboard")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_dashboard_with_user_role_redirects_home() {
    let app = TestApp::new();
    let credential = app.credential(Role::User);
    let response = app.send(get_with_cookie("/dashboard", &credential)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
}

#[tokio::test]
async fn test_dashboard_with_admin_role_passes() {
    let app = TestApp::new();
    let credential = app.credential(Role::Admin);
    let response = app.send(get_with_cookie("/dashboard", &credential)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_profile_page_rejects_expired_and_forged_cookies() {
    let app = TestApp::new();
    let credential = app.credential(Role::User);

    let response = app.send(get_with_cookie("/profile", &credential)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(get_with_cookie("/profile", "forged.credential.value")).await;
    assert_eq!(location(&response), Some("/login"));

    app.clock.advance(Duration::from_secs(3600));
    let response = app.send(get_with_cookie("/profile", &credential)).await;
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_public_pages_pass_through() {
    let app = TestApp::new();
    let response = app.send(get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_login_page_redirects_any_cookie_by_default() {
    let app = TestApp::new();

    let response = app.send(get("/login")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(get_with_cookie("/login", "not-even-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
}

#[tokio::test]
async fn test_login_page_validity_check_lets_forged_cookie_through() {
    let app = TestApp::with_config(|c| c.auth.auth_page_check = AuthPageCheck::Validity);

    let response = app.send(get_with_cookie("/register", "not-even-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let credential = app.credential(Role::User);
    let response = app.send(get_with_cookie("/register", &credential)).await;
    assert_eq!(location(&response), Some("/"));
}
