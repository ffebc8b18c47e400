// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PlayPal API Server
//!
//! Lets players find local sports teams, create their own, and join or
//! leave teams.

use playpal::{
    config::{BackendKind, Config},
    db::FirestoreDb,
    services::AuthService,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        backend = ?config.backend,
        delete_policy = ?config.delete_policy,
        "Starting PlayPal API"
    );

    let (db, auth) = match config.backend {
        BackendKind::Gcp => {
            let db = FirestoreDb::new(&config.gcp_project_id).await?;
            let auth = AuthService::new(
                config.firebase_api_key.clone(),
                config.auth_emulator_host.as_deref(),
            );
            (db, auth)
        }
        BackendKind::Memory => {
            tracing::warn!("Using in-memory storage and auth; data is lost on restart");
            (FirestoreDb::new_in_memory(), AuthService::new_in_memory())
        }
    };

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db, auth));

    // Build router
    let app = playpal::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("playpal=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
