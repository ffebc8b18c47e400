//! Application configuration loaded from environment variables.
//!
//! Cloud Run injects secrets as environment variables, so everything is
//! read from the environment once at startup.

use crate::services::DeletePolicy;
use std::env;

/// Where teams, profiles and accounts live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Firestore + Firebase Authentication
    Gcp,
    /// In-process stores; nothing survives a restart
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Storage and auth backend
    pub backend: BackendKind,
    /// Rule for deleting teams that still have members
    pub delete_policy: DeletePolicy,
    /// Firebase Auth emulator `host:port`, if running against it
    pub auth_emulator_host: Option<String>,

    // --- Secrets ---
    /// Firebase Web API key for the Identity Toolkit
    pub firebase_api_key: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            backend: BackendKind::Memory,
            delete_policy: DeletePolicy::CreatorOnly,
            auth_emulator_host: None,
            firebase_api_key: "test_api_key".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let backend = match env::var("PLAYPAL_BACKEND").as_deref() {
            Ok("memory") => BackendKind::Memory,
            Ok("gcp") | Err(_) => BackendKind::Gcp,
            Ok(_) => return Err(ConfigError::Invalid("PLAYPAL_BACKEND")),
        };

        let delete_policy = match env::var("TEAM_DELETE_POLICY") {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("TEAM_DELETE_POLICY"))?,
            Err(_) => DeletePolicy::default(),
        };

        // The in-memory auth backend never calls Firebase, so no key is needed
        let firebase_api_key = match env::var("FIREBASE_API_KEY") {
            Ok(v) => v.trim().to_string(),
            Err(_) if backend == BackendKind::Memory => String::new(),
            Err(_) => return Err(ConfigError::Missing("FIREBASE_API_KEY")),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            backend,
            delete_policy,
            auth_emulator_host: env::var("FIREBASE_AUTH_EMULATOR_HOST").ok(),
            firebase_api_key,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
