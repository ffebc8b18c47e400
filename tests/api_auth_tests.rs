// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid tokens
//! 2. Registration and login issue tokens that protected routes accept
//! 3. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::request("GET", "/api/me", None, &state))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .header(header::AUTHORIZATION, "Bearer invalid.token.here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_valid_token() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::request("GET", "/api/me", Some("u1"), &state))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["uid"], "u1");
    assert_eq!(body["displayName"], "u1 name");
}

#[tokio::test]
async fn test_register_login_and_use_token() {
    let (app, state) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/auth/register",
            None,
            &state,
            Some(json!({
                "email": "pat@example.com",
                "password": "hunter22",
                "displayName": "Pat"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::SET_COOKIE));
    let registered = common::body_json(response).await;
    let uid = registered["user"]["uid"].as_str().unwrap().to_string();
    assert_eq!(registered["user"]["displayName"], "Pat");

    // Registration stores the profile used for member names
    let profile = state.db.get_profile(&uid).await.unwrap().unwrap();
    assert_eq!(profile.display_name, "Pat");
    assert_eq!(profile.email, "pat@example.com");

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/auth/login",
            None,
            &state,
            Some(json!({ "email": "pat@example.com", "password": "hunter22" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let login = common::body_json(response).await;
    let token = login["token"].as_str().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_json(response).await["uid"], uid.as_str());
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("cookie-user", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .header(header::COOKIE, format!("playpal_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failure_message_is_verbatim() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/auth/login",
            None,
            &state,
            Some(json!({ "email": "nobody@example.com", "password": "whatever" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert_eq!(body["details"], "EMAIL_NOT_FOUND");
}

#[tokio::test]
async fn test_login_requires_credentials() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/auth/login",
            None,
            &state,
            Some(json!({ "email": "  ", "password": "" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_federated_login_creates_profile() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/auth/federated",
            None,
            &state,
            Some(json!({ "idToken": "google-id-token" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let uid = body["user"]["uid"].as_str().unwrap();
    assert!(state.db.get_profile(uid).await.unwrap().is_some());
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::request("POST", "/auth/logout", Some("u1"), &state))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("playpal_token="));
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/teams")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // OPTIONS should return 200 (CORS preflight success)
    assert_eq!(response.status(), StatusCode::OK);

    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_cors_rejects_lookalike_localhost() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/teams")
                .header(header::ORIGIN, "http://localhost.attacker.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(!response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_public_route_no_auth_required() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::request("GET", "/health", None, &state))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
