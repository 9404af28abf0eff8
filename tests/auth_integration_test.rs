//! Integration tests for the session gate.
//!
//! Tests cover:
//! - Login input validation and credential rejection
//! - Business routes refusing requests without a session
//! - Logout invalidating the cookie
//! - Profile updates and password rotation

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, session_cookie_from, TestApp, USER_EMAIL, USER_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn login_rejects_malformed_input_with_400() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "email": "not-an-email", "password": "x" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::POST, "/api/login", Some(json!({ "email": USER_EMAIL })), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_credentials_get_401_with_one_message() {
    let app = TestApp::new().await;

    for body in [
        json!({ "email": USER_EMAIL, "password": "wrong-password" }),
        json!({ "email": "nobody@garage.test", "password": USER_PASSWORD }),
    ] {
        let response = app.request(Method::POST, "/api/login", Some(body), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = response_json(response).await;
        assert!(
            json["message"]
                .as_str()
                .unwrap_or_default()
                .contains("Invalid email or password"),
            "unexpected body {}",
            json
        );
    }
}

#[tokio::test]
async fn login_returns_user_and_sets_http_only_cookie() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "email": USER_EMAIL.to_uppercase(), "password": USER_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let raw_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(raw_cookie.contains("HttpOnly"));
    assert!(raw_cookie.starts_with(&app.state.config.session_cookie_name));

    let json = response_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["email"], USER_EMAIL);
}

#[tokio::test]
async fn business_routes_require_a_session() {
    let app = TestApp::new().await;

    for uri in [
        "/api/dashboard",
        "/api/user",
        "/api/masters/services",
        "/api/technicians",
        "/api/job-cards",
        "/api/inquiries",
        "/api/invoices",
        "/api/appointments",
    ] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);

        let response = app
            .request(Method::GET, uri, None, Some("autogarage.sid=forged-token"))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn current_user_and_logout() {
    let app = TestApp::new().await;

    let user = app
        .expect(Method::GET, "/api/user", None, StatusCode::OK)
        .await;
    assert_eq!(user["email"], USER_EMAIL);
    assert!(user["id"].is_string());

    let response = app.authed(Method::POST, "/api/logout", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cleared.contains("Max-Age=0"));

    let response = app.authed(Method::GET, "/api/user", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn password_change_logs_out_other_sessions() {
    let app = TestApp::new().await;

    let other = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "email": USER_EMAIL, "password": USER_PASSWORD })),
            None,
        )
        .await;
    let other_cookie = session_cookie_from(&other).expect("second session");

    let response = app
        .authed(Method::PATCH, "/api/user", Some(json!({ "password": "123" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let updated = app
        .expect(
            Method::PATCH,
            "/api/user",
            Some(json!({ "name": "Workshop Owner", "password": "new-secret" })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(updated["name"], "Workshop Owner");

    // the session that made the change survives, the other one does not
    let response = app.authed(Method::GET, "/api/user", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .request(Method::GET, "/api/user", None, Some(&other_cookie))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "email": USER_EMAIL, "password": "new-secret" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}
