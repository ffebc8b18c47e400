// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Authentication client (Identity Toolkit REST API).
//!
//! Handles:
//! - Email/password registration and sign-in
//! - Federated sign-in with a provider ID token (Google)
//! - Publishing identity changes to a [`SessionHolder`]

use crate::error::AppError;
use crate::models::Identity;
use crate::services::session::SessionHolder;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const FEDERATED_PROVIDER_ID: &str = "google.com";
const MIN_PASSWORD_LEN: usize = 6;

/// Account record for the in-memory provider.
struct MemoryAccount {
    uid: String,
    password_digest: String,
    display_name: Option<String>,
    email: Option<String>,
}

#[derive(Clone)]
enum Backend {
    IdentityToolkit {
        http: reqwest::Client,
        base_url: String,
        api_key: String,
    },
    Memory(Arc<DashMap<String, MemoryAccount>>),
}

/// Auth provider client.
#[derive(Clone)]
pub struct AuthService {
    backend: Backend,
}

/// Successful response from the `accounts:*` endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'a> {
    post_body: String,
    request_uri: &'a str,
    return_secure_token: bool,
}

impl AccountResponse {
    fn into_identity(self) -> Identity {
        Identity {
            uid: self.local_id,
            display_name: self.display_name.filter(|n| !n.is_empty()),
            email: self.email.filter(|e| !e.is_empty()),
        }
    }
}

impl AuthService {
    /// Create a client for the Identity Toolkit API.
    ///
    /// For local development with the auth emulator, pass its `host:port`.
    pub fn new(api_key: String, emulator_host: Option<&str>) -> Self {
        let base_url = match emulator_host {
            Some(host) => {
                tracing::info!(host, "Using Firebase Auth emulator");
                format!("http://{}/identitytoolkit.googleapis.com/v1", host)
            }
            None => IDENTITY_TOOLKIT_URL.to_string(),
        };

        Self {
            backend: Backend::IdentityToolkit {
                http: reqwest::Client::new(),
                base_url,
                api_key,
            },
        }
    }

    /// Create an in-memory provider (tests and local runs without GCP).
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(DashMap::new())),
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in(
        &self,
        session: &SessionHolder,
        email: &str,
        password: &str,
    ) -> Result<Identity, AppError> {
        let identity = match &self.backend {
            Backend::IdentityToolkit { .. } => {
                let body = PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                };
                self.call("accounts:signInWithPassword", &body)
                    .await?
                    .into_identity()
            }
            Backend::Memory(accounts) => {
                let account = accounts
                    .get(&email.to_lowercase())
                    .ok_or_else(|| AppError::Auth("EMAIL_NOT_FOUND".to_string()))?;
                if account.password_digest != digest(password) {
                    return Err(AppError::Auth("INVALID_PASSWORD".to_string()));
                }
                Identity {
                    uid: account.uid.clone(),
                    display_name: account.display_name.clone(),
                    email: account.email.clone(),
                }
            }
        };

        tracing::info!(uid = %identity.uid, "User signed in");
        session.set(Some(identity.clone()));
        Ok(identity)
    }

    /// Create an email/password account and set its display name.
    pub async fn register(
        &self,
        session: &SessionHolder,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, AppError> {
        let identity = match &self.backend {
            Backend::IdentityToolkit { .. } => {
                let body = PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                };
                let created = self.call("accounts:signUp", &body).await?;
                let id_token = created.id_token.clone().ok_or_else(|| {
                    AppError::Auth("Sign-up response did not include an ID token".to_string())
                })?;

                let update = UpdateProfileRequest {
                    id_token: &id_token,
                    display_name,
                    return_secure_token: false,
                };
                let updated = self.call("accounts:update", &update).await?;

                Identity {
                    uid: created.local_id,
                    display_name: updated.display_name.filter(|n| !n.is_empty()),
                    email: created.email.filter(|e| !e.is_empty()),
                }
            }
            Backend::Memory(accounts) => {
                if email.trim().is_empty() {
                    return Err(AppError::Auth("MISSING_EMAIL".to_string()));
                }
                if password.len() < MIN_PASSWORD_LEN {
                    return Err(AppError::Auth(
                        "WEAK_PASSWORD : Password should be at least 6 characters".to_string(),
                    ));
                }
                let Entry::Vacant(slot) = accounts.entry(email.to_lowercase()) else {
                    return Err(AppError::Auth("EMAIL_EXISTS".to_string()));
                };
                let account = slot.insert(MemoryAccount {
                    uid: uuid::Uuid::new_v4().simple().to_string(),
                    password_digest: digest(password),
                    display_name: Some(display_name.to_string()).filter(|n| !n.is_empty()),
                    email: Some(email.to_string()),
                });
                Identity {
                    uid: account.uid.clone(),
                    display_name: account.display_name.clone(),
                    email: account.email.clone(),
                }
            }
        };

        tracing::info!(uid = %identity.uid, "User registered");
        session.set(Some(identity.clone()));
        Ok(identity)
    }

    /// Sign in with an ID token issued by the federated provider.
    pub async fn sign_in_with_federated_provider(
        &self,
        session: &SessionHolder,
        id_token: &str,
    ) -> Result<Identity, AppError> {
        let identity = match &self.backend {
            Backend::IdentityToolkit { .. } => {
                let body = IdpRequest {
                    post_body: format!(
                        "id_token={}&providerId={}",
                        urlencoding::encode(id_token),
                        FEDERATED_PROVIDER_ID
                    ),
                    request_uri: "http://localhost",
                    return_secure_token: true,
                };
                self.call("accounts:signInWithIdp", &body)
                    .await?
                    .into_identity()
            }
            Backend::Memory(accounts) => {
                if id_token.is_empty() {
                    return Err(AppError::Auth("INVALID_IDP_RESPONSE".to_string()));
                }
                let key = format!("{}:{}", FEDERATED_PROVIDER_ID, digest(id_token));
                let account = accounts.entry(key).or_insert_with(|| MemoryAccount {
                    uid: uuid::Uuid::new_v4().simple().to_string(),
                    password_digest: String::new(),
                    display_name: None,
                    email: None,
                });
                Identity {
                    uid: account.uid.clone(),
                    display_name: account.display_name.clone(),
                    email: account.email.clone(),
                }
            }
        };

        tracing::info!(uid = %identity.uid, provider = FEDERATED_PROVIDER_ID, "User signed in");
        session.set(Some(identity.clone()));
        Ok(identity)
    }

    /// Sign out. Sessions are token based, so this only clears the holder.
    pub fn sign_out(&self, session: &SessionHolder) {
        if let Some(identity) = session.current() {
            tracing::info!(uid = %identity.uid, "User signed out");
        }
        session.clear();
    }

    /// POST to an `accounts:*` endpoint and decode the account response.
    async fn call<B: Serialize>(&self, method: &str, body: &B) -> Result<AccountResponse, AppError> {
        let Backend::IdentityToolkit {
            http,
            base_url,
            api_key,
        } = &self.backend
        else {
            return Err(AppError::Internal(anyhow::anyhow!(
                "Identity Toolkit call on in-memory auth backend"
            )));
        };

        let url = format!("{}/{}", base_url, method);
        let response = http
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Auth request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("Auth provider returned {}", status));
            tracing::warn!(method, status = %status, error = %message, "Auth provider error");
            return Err(AppError::Auth(message));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Invalid auth provider response: {}", e)))
    }
}

fn digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}
