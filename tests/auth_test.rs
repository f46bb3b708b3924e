//! Integration tests for signup, login, logout, and token handling.

mod helpers;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use chathub_auth::{Claims, JwtCodec, TokenCodec};
use chathub_entity::UserRole;

use helpers::{PASSWORD, SECRET, TestApp};

#[tokio::test]
async fn signup_creates_account() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({
                "email": "Ada@Example.com",
                "password": PASSWORD,
                "confirmedPassword": PASSWORD,
                "firstName": "Ada",
                "lastName": "Lovelace"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["email"], "ada@example.com");
    assert_eq!(response.body["data"]["role"], "USER");
    assert!(response.body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn signup_rejects_mismatched_confirmation() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({
                "email": "ada@example.com",
                "password": PASSWORD,
                "confirmedPassword": "something-else",
                "firstName": "Ada",
                "lastName": "Lovelace"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn signup_rejects_invalid_fields() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({
                "email": "not-an-email",
                "password": PASSWORD,
                "confirmedPassword": PASSWORD,
                "firstName": "",
                "lastName": "Lovelace"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["details"].get("email").is_some());
    assert!(response.body["details"].get("first_name").is_some());
}

#[tokio::test]
async fn signup_rejects_duplicate_email() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({
                "email": "ada@example.com",
                "password": PASSWORD,
                "confirmedPassword": PASSWORD,
                "firstName": "Ada",
                "lastName": "Lovelace"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "User already exists.");
}

#[tokio::test]
async fn login_returns_user_and_token() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com", UserRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], user.id.to_string());
    let token = response.body["data"]["token"].as_str().unwrap();

    let claims = JwtCodec::default().parse(token, SECRET).unwrap();
    assert_eq!(claims.user_id, user.id.to_string());
    assert_eq!(claims.email, "ada@example.com");
    assert_eq!(claims.role, "USER");
    assert!(Uuid::parse_str(&claims.auth_uuid).is_ok());
}

#[tokio::test]
async fn wrong_password_is_login_credentials_incorrect() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "LOGIN_CREDENTIALS_INCORRECT");
}

#[tokio::test]
async fn unknown_email_is_login_credentials_incorrect() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "LOGIN_CREDENTIALS_INCORRECT");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new();
    let (_, token) = app.user_with_token("ada@example.com", UserRole::User).await;

    let me = app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);

    let logout = app.request("POST", "/api/auth/logout", None, Some(&token)).await;
    assert_eq!(logout.status, StatusCode::OK);

    let after = app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.body["error"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn logout_ends_access_to_role_gated_routes() {
    let app = TestApp::new();
    let (_, token) = app.user_with_token("root@example.com", UserRole::Admin).await;

    let listed = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(listed.status, StatusCode::OK);

    let logout = app.request("POST", "/api/auth/logout", None, Some(&token)).await;
    assert_eq!(logout.status, StatusCode::OK);

    let after = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.body["error"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn other_sessions_survive_logout() {
    let app = TestApp::new();
    let (_, first) = app.user_with_token("ada@example.com", UserRole::User).await;
    let second = app.login("ada@example.com").await;

    app.request("POST", "/api/auth/logout", None, Some(&first)).await;

    let response = app.request("GET", "/api/users/me", None, Some(&second)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn missing_or_malformed_header_is_authorization_error() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/users/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTHORIZATION_ERROR");

    let response = app.request("GET", "/api/users/me", None, Some("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTHORIZATION_ERROR");
}

#[tokio::test]
async fn expired_token_is_token_expired() {
    let app = TestApp::new();
    let now = Utc::now().timestamp();
    let claims = Claims {
        email: "ada@example.com".into(),
        user_id: Uuid::new_v4().to_string(),
        auth_uuid: Uuid::new_v4().to_string(),
        role: "USER".into(),
        iat: now - 3600,
        exp: now - 60,
    };
    let token = JwtCodec::default().create(&claims, SECRET).unwrap();

    let response = app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn token_with_non_uuid_ids_is_malformed() {
    let app = TestApp::new();
    let now = Utc::now().timestamp();
    let claims = Claims {
        email: "ada@example.com".into(),
        user_id: "1".into(),
        auth_uuid: "2".into(),
        role: "USER".into(),
        iat: now,
        exp: now + 600,
    };
    let token = JwtCodec::default().create(&claims, SECRET).unwrap();

    let response = app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "TOKEN_MALFORMED");
}

#[tokio::test]
async fn unrecorded_session_is_rejected() {
    let app = TestApp::new();
    let now = Utc::now().timestamp();
    let claims = Claims {
        email: "ada@example.com".into(),
        user_id: Uuid::new_v4().to_string(),
        auth_uuid: Uuid::new_v4().to_string(),
        role: "SUPER_ADMIN".into(),
        iat: now,
        exp: now + 600,
    };
    let token = JwtCodec::default().create(&claims, SECRET).unwrap();

    let response = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["cache"], "connected");
}
