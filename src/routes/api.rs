// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::models::Identity;
use crate::routes::teams::{team_details, team_not_found, TeamDetails};
use crate::services::membership::{ActionOutcome, ActionReport, Rejection};
use crate::services::{NewTeamRequest, SessionHolder, TeamAction};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/teams", post(create_team))
        .route("/api/teams/{id}/join", post(join_team))
        .route("/api/teams/{id}/quit", post(quit_team))
        .route("/api/teams/{id}", delete(delete_team))
}

/// Identity attached by `require_auth`.
fn signed_in(session: &SessionHolder) -> Result<Identity> {
    session.current().ok_or(AppError::Unauthorized)
}

// ─── User Profile ────────────────────────────────────────────

/// Get the signed-in identity.
async fn get_me(Extension(session): Extension<SessionHolder>) -> Result<Json<Identity>> {
    Ok(Json(signed_in(&session)?))
}

// ─── Team Creation ───────────────────────────────────────────

/// Create a team owned by the caller.
async fn create_team(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHolder>,
    Json(request): Json<NewTeamRequest>,
) -> Result<(StatusCode, Json<TeamDetails>)> {
    let creator = signed_in(&session)?;
    let team = state.creation.create(&request, &creator).await?;
    let details = team_details(&state, team, Some(&creator)).await;
    Ok((StatusCode::CREATED, Json(details)))
}

// ─── Membership Actions ──────────────────────────────────────

/// Response to join, quit and delete.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    /// Team as re-read after the action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamDetails>,
    /// Page the client should go to next
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigate: Option<&'static str>,
}

fn action_status(outcome: &ActionOutcome) -> StatusCode {
    match outcome {
        ActionOutcome::Applied => StatusCode::OK,
        ActionOutcome::Rejected(Rejection::NotSignedIn(_)) => StatusCode::UNAUTHORIZED,
        ActionOutcome::Rejected(Rejection::TeamNotFound) => StatusCode::NOT_FOUND,
        ActionOutcome::Rejected(r) if r.is_permission() => StatusCode::FORBIDDEN,
        ActionOutcome::Rejected(_) => StatusCode::CONFLICT,
        ActionOutcome::Failed(_) => StatusCode::BAD_GATEWAY,
    }
}

async fn action_response(state: &AppState, report: ActionReport, viewer: &Identity) -> Response {
    let status = action_status(&report.outcome);
    let navigate = (report.action == TeamAction::Delete && report.is_applied()).then_some("teams");

    let team = match report.team {
        Some(team) => Some(team_details(state, team, Some(viewer)).await),
        None => None,
    };

    let body = ActionResponse {
        success: report.outcome == ActionOutcome::Applied,
        message: report.message,
        team,
        navigate,
    };
    (status, Json(body)).into_response()
}

async fn run_action(
    state: &AppState,
    session: &SessionHolder,
    action: TeamAction,
    team_id: &str,
) -> Result<Response> {
    let viewer = signed_in(session)?;
    let report = state
        .membership
        .perform(action, team_id, Some(&viewer))
        .await;

    if report.outcome == ActionOutcome::Rejected(Rejection::TeamNotFound) {
        return Ok(team_not_found());
    }
    Ok(action_response(state, report, &viewer).await)
}

/// Join a team.
async fn join_team(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHolder>,
    Path(team_id): Path<String>,
) -> Result<Response> {
    run_action(&state, &session, TeamAction::Join, &team_id).await
}

/// Quit a team.
async fn quit_team(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHolder>,
    Path(team_id): Path<String>,
) -> Result<Response> {
    run_action(&state, &session, TeamAction::Quit, &team_id).await
}

/// Delete a team (creator only).
async fn delete_team(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHolder>,
    Path(team_id): Path<String>,
) -> Result<Response> {
    run_action(&state, &session, TeamAction::Delete, &team_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_status_mapping() {
        assert_eq!(action_status(&ActionOutcome::Applied), StatusCode::OK);
        assert_eq!(
            action_status(&ActionOutcome::Rejected(Rejection::TeamFull)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            action_status(&ActionOutcome::Rejected(Rejection::CreatorCannotQuit)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            action_status(&ActionOutcome::Rejected(Rejection::NotSignedIn(
                TeamAction::Join
            ))),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            action_status(&ActionOutcome::Failed("boom".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }
}
