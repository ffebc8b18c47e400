// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.
//!
//! Both middlewares put a [`SessionHolder`] in the request extensions:
//! `require_auth` rejects requests without a valid token, `optional_auth`
//! lets them through with a signed-out session.

use crate::models::Identity;
use crate::services::SessionHolder;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie carrying the session JWT.
pub const SESSION_COOKIE: &str = "playpal_token";

const SESSION_TTL_SECS: usize = 30 * 24 * 60 * 60; // 30 days

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (auth provider uid)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = session_token(&jar, &request).ok_or(StatusCode::UNAUTHORIZED)?;
    let identity =
        verify_jwt(&token, &state.config.jwt_signing_key).ok_or(StatusCode::UNAUTHORIZED)?;

    request
        .extensions_mut()
        .insert(SessionHolder::signed_in(identity));

    Ok(next.run(request).await)
}

/// Middleware that attaches the caller's session if there is a valid token.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = session_token(&jar, &request)
        .and_then(|token| verify_jwt(&token, &state.config.jwt_signing_key));

    let session = match identity {
        Some(identity) => SessionHolder::signed_in(identity),
        None => SessionHolder::new(),
    };
    request.extensions_mut().insert(session);

    next.run(request).await
}

/// Token from the session cookie, else from a `Bearer` header.
fn session_token(jar: &CookieJar, request: &Request) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Decode a session JWT into the identity it was issued for.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Option<Identity> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let claims = decode::<Claims>(token, &key, &validation).ok()?.claims;
    if claims.sub.is_empty() {
        return None;
    }

    Some(Identity {
        uid: claims.sub,
        display_name: claims.name,
        email: claims.email,
    })
}

/// Create a JWT for a user session.
pub fn create_jwt(identity: &Identity, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: identity.uid.clone(),
        name: identity.display_name.clone(),
        email: identity.email.clone(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_round_trip_keeps_identity() {
        let identity = Identity {
            uid: "u42".to_string(),
            display_name: Some("Quinn".to_string()),
            email: None,
        };
        let token = create_jwt(&identity, b"key").unwrap();
        assert_eq!(verify_jwt(&token, b"key"), Some(identity));
    }

    #[test]
    fn test_jwt_wrong_key_rejected() {
        let identity = Identity {
            uid: "u42".to_string(),
            display_name: None,
            email: None,
        };
        let token = create_jwt(&identity, b"key").unwrap();
        assert_eq!(verify_jwt(&token, b"other"), None);
        assert_eq!(verify_jwt("not.a.jwt", b"key"), None);
    }
}
