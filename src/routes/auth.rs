// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, registration and sign-out routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::{Identity, Profile};
use crate::services::SessionHolder;
use crate::AppState;

/// Routes that start a session.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/federated", post(federated_login))
}

/// Routes that act on the caller's existing session.
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    display_name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedLoginRequest {
    /// ID token from the provider's client-side sign-in
    #[serde(default)]
    id_token: String,
}

/// Session token and the identity it belongs to.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub token: String,
    pub user: Identity,
}

fn require_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

/// Register with email and password.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    require_credentials(&body.email, &body.password)?;

    let session = SessionHolder::new();
    let identity = state
        .auth
        .register(&session, body.email.trim(), &body.password, body.display_name.trim())
        .await?;

    start_session(&state, jar, &identity, Some(body.display_name.trim())).await
}

/// Sign in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    require_credentials(&body.email, &body.password)?;

    let session = SessionHolder::new();
    let identity = state
        .auth
        .sign_in(&session, body.email.trim(), &body.password)
        .await?;

    start_session(&state, jar, &identity, None).await
}

/// Sign in with a federated provider token.
async fn federated_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<FederatedLoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    if body.id_token.is_empty() {
        return Err(AppError::BadRequest("idToken is required".to_string()));
    }

    let session = SessionHolder::new();
    let identity = state
        .auth
        .sign_in_with_federated_provider(&session, &body.id_token)
        .await?;

    start_session(&state, jar, &identity, None).await
}

/// Save the profile used for member names, then issue the session token.
async fn start_session(
    state: &AppState,
    jar: CookieJar,
    identity: &Identity,
    given_name: Option<&str>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let profile = Profile::for_identity(identity, given_name);
    state.db.upsert_profile(&identity.uid, &profile).await?;

    let token = create_jwt(identity, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            token,
            user: identity.clone(),
        }),
    ))
}

/// Sign out and clear the session cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHolder>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    state.auth.sign_out(&session);
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, StatusCode::NO_CONTENT)
}
