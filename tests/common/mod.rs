// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use playpal::config::Config;
use playpal::db::FirestoreDb;
use playpal::middleware::auth::create_jwt;
use playpal::models::{Identity, Team};
use playpal::routes::create_router;
use playpal::services::AuthService;
use playpal::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app over in-memory storage and auth.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), FirestoreDb::new_in_memory())
}

/// Create a test app whose database is offline; every store call fails.
#[allow(dead_code)]
pub fn create_offline_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), FirestoreDb::new_mock())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config, db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, db, AuthService::new_in_memory()));
    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn identity(uid: &str) -> Identity {
    Identity {
        uid: uid.to_string(),
        display_name: Some(format!("{} name", uid)),
        email: Some(format!("{}@example.com", uid)),
    }
}

/// Create a session JWT for `uid`.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str, signing_key: &[u8]) -> String {
    create_jwt(&identity(uid), signing_key).unwrap()
}

/// A stored team with the given creator, members and capacity.
#[allow(dead_code)]
pub fn test_team(id: &str, creator: &str, members: &[&str], max_members: u32) -> Team {
    Team {
        id: id.to_string(),
        team_name: format!("Team {}", id),
        sport: "Volleyball".to_string(),
        location: "Santa Cruz".to_string(),
        description: "Beach games".to_string(),
        max_members,
        members: members.iter().map(|m| m.to_string()).collect(),
        creator_id: creator.to_string(),
        creator_name: format!("{} name", creator),
        created_at: parse_time("2026-06-01T12:00:00Z"),
    }
}

/// Parse an RFC 3339 timestamp for fixtures.
#[allow(dead_code)]
pub fn parse_time(s: &str) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .unwrap()
        .with_timezone(&chrono::Utc)
}

/// Build a request, optionally authenticated as `uid`.
#[allow(dead_code)]
pub fn request(method: &str, uri: &str, as_uid: Option<&str>, state: &AppState) -> Request<Body> {
    json_request(method, uri, as_uid, state, None)
}

#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    as_uid: Option<&str>,
    state: &AppState,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(uid) = as_uid {
        let token = create_test_jwt(uid, &state.config.jwt_signing_key);
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
