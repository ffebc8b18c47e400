// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Directory routes: browse, search and view teams. Open to guests.

use crate::error::Result;
use crate::models::sport::ALL_SPORTS;
use crate::models::{Identity, Sport, Team};
use crate::services::directory::{filter_teams, sport_icon, MemberName, ViewerStatus};
use crate::services::membership::TeamAccess;
use crate::services::{SessionHolder, TeamAction, TeamFilter};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use futures_util::{stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Directory routes. The optional-auth layer is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sports", get(list_sports))
        .route("/teams", get(list_teams))
        .route("/teams/{id}", get(get_team))
}

// ─── Sports ──────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SportOption {
    pub name: &'static str,
    pub icon: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SportsResponse {
    /// Choices for the creation form
    pub sports: Vec<SportOption>,
    /// Choices for the directory filter, starting with "All"
    pub filter_options: Vec<&'static str>,
}

async fn list_sports() -> Json<SportsResponse> {
    let sports = Sport::ALL
        .iter()
        .map(|s| SportOption {
            name: s.name(),
            icon: s.icon(),
        })
        .collect();
    let filter_options = std::iter::once(ALL_SPORTS)
        .chain(Sport::ALL.iter().map(|s| s.name()))
        .collect();

    Json(SportsResponse {
        sports,
        filter_options,
    })
}

// ─── Directory ───────────────────────────────────────────────

/// A team card in the directory.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamSummary {
    #[serde(flatten)]
    pub team: Team,
    pub icon: &'static str,
    pub member_count: usize,
    pub member_names: Vec<String>,
    pub viewer_status: ViewerStatus,
}

/// Why the directory has nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum EmptyState {
    /// No teams exist yet
    NoTeams,
    /// Teams exist but none match the filter
    NoMatches,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DirectoryResponse {
    pub teams: Vec<TeamSummary>,
    /// Number of teams before filtering
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyState>,
}

/// List teams, newest first, filtered by `search` and `sport`.
async fn list_teams(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHolder>,
    Query(filter): Query<TeamFilter>,
) -> Result<Json<DirectoryResponse>> {
    let viewer = session.current();
    let all = state.directory.list_all().await?;
    let total = all.len();
    let matching = filter_teams(all, &filter);

    let empty_state = match (total, matching.len()) {
        (0, _) => Some(EmptyState::NoTeams),
        (_, 0) => Some(EmptyState::NoMatches),
        _ => None,
    };

    let teams: Vec<TeamSummary> = stream::iter(matching)
        .then(|team| {
            let state = &state;
            let viewer = viewer.as_ref();
            async move {
                let member_names = state
                    .directory
                    .member_names(&team.members)
                    .await
                    .into_iter()
                    .map(|m| m.name)
                    .collect();
                TeamSummary {
                    icon: sport_icon(&team.sport),
                    member_count: team.members.len(),
                    member_names,
                    viewer_status: ViewerStatus::for_team(&team, viewer),
                    team,
                }
            }
        })
        .collect()
        .await;

    Ok(Json(DirectoryResponse {
        teams,
        total,
        empty_state,
    }))
}

// ─── Team Details ────────────────────────────────────────────

/// A team as seen by one viewer.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamDetails {
    #[serde(flatten)]
    pub team: Team,
    pub icon: &'static str,
    pub member_count: usize,
    /// Members with their display names, in join order
    pub roster: Vec<MemberName>,
    pub is_member: bool,
    pub is_creator: bool,
    pub is_full: bool,
    /// Actions to offer; empty means view only
    pub actions: Vec<TeamAction>,
}

/// Body of the "team not found" page.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamNotFound {
    pub error: &'static str,
    pub title: &'static str,
    /// The only way out is back to the directory
    pub actions: Vec<&'static str>,
}

pub fn team_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(TeamNotFound {
            error: "team_not_found",
            title: "Team Not Found",
            actions: vec!["back"],
        }),
    )
        .into_response()
}

/// Build the details view of `team` for `viewer`, resolving member names.
pub async fn team_details(state: &AppState, team: Team, viewer: Option<&Identity>) -> TeamDetails {
    let access = TeamAccess::evaluate(&team, viewer);
    let roster = state.directory.member_names(&team.members).await;

    TeamDetails {
        icon: sport_icon(&team.sport),
        member_count: team.members.len(),
        roster,
        is_member: access.is_member,
        is_creator: access.is_creator,
        is_full: access.is_full,
        actions: access.available_actions(state.membership.delete_policy()),
        team,
    }
}

/// Get one team by id.
async fn get_team(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHolder>,
    Path(team_id): Path<String>,
) -> Result<Response> {
    let Some(team) = state.directory.view_details(&team_id).await? else {
        return Ok(team_not_found());
    };

    let viewer = session.current();
    let details = team_details(&state, team, viewer.as_ref()).await;
    Ok(Json(details).into_response())
}
