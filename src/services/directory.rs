// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team directory: listing, search/sport filtering, icon lookup and
//! member display names.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::sport::{ALL_SPORTS, FALLBACK_ICON};
use crate::models::{Identity, Sport, Team};
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_CONCURRENT_PROFILE_LOOKUPS: usize = 16;

/// Display glyph for a sport name. Unknown names get the generic trophy.
pub fn sport_icon(sport: &str) -> &'static str {
    Sport::from_name(sport)
        .map(Sport::icon)
        .unwrap_or(FALLBACK_ICON)
}

/// Directory search and sport filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamFilter {
    /// Case-insensitive substring of team name or location
    #[serde(default)]
    pub search: String,
    /// Exact sport name; empty or "All" matches every sport
    #[serde(default)]
    pub sport: Option<String>,
}

impl TeamFilter {
    pub fn new(search: impl Into<String>, sport: Option<&str>) -> Self {
        Self {
            search: search.into(),
            sport: sport.map(str::to_string),
        }
    }

    pub fn matches(&self, team: &Team) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = team.team_name.to_lowercase().contains(&needle)
            || team.location.to_lowercase().contains(&needle);

        let matches_sport = match self.sport.as_deref() {
            None | Some("") | Some(ALL_SPORTS) => true,
            Some(sport) => team.sport == sport,
        };

        matches_search && matches_sport
    }
}

/// Keep the teams matching `filter`, preserving order.
pub fn filter_teams(teams: Vec<Team>, filter: &TeamFilter) -> Vec<Team> {
    teams.into_iter().filter(|t| filter.matches(t)).collect()
}

/// Find a team in a listing by id.
pub fn find_team<'a>(teams: &'a [Team], team_id: &str) -> Option<&'a Team> {
    teams.iter().find(|t| t.id == team_id)
}

/// How a team card presents itself to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ViewerStatus {
    /// Not signed in
    Guest,
    /// "Your Team"
    Creator,
    Member,
    Full,
    Open,
}

impl ViewerStatus {
    pub fn for_team(team: &Team, viewer: Option<&Identity>) -> Self {
        match viewer {
            None => ViewerStatus::Guest,
            Some(v) if team.is_creator(&v.uid) => ViewerStatus::Creator,
            Some(v) if team.has_member(&v.uid) => ViewerStatus::Member,
            Some(_) if team.is_full() => ViewerStatus::Full,
            Some(_) => ViewerStatus::Open,
        }
    }
}

/// A member id with the name to show for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MemberName {
    pub uid: String,
    pub name: String,
}

/// Directory reads against the teams and profiles collections.
#[derive(Clone)]
pub struct DirectoryService {
    db: FirestoreDb,
}

impl DirectoryService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Every team, newest first.
    pub async fn list_all(&self) -> Result<Vec<Team>, AppError> {
        self.db.list_teams().await
    }

    /// Teams matching `filter`, newest first.
    pub async fn search(&self, filter: &TeamFilter) -> Result<Vec<Team>, AppError> {
        Ok(filter_teams(self.list_all().await?, filter))
    }

    /// Resolve a team by id from the full listing.
    pub async fn view_details(&self, team_id: &str) -> Result<Option<Team>, AppError> {
        let teams = self.list_all().await?;
        Ok(find_team(&teams, team_id).cloned())
    }

    /// Display names for `members`, in member order.
    ///
    /// Lookups run concurrently. A failed lookup, a missing profile or a
    /// blank display name all fall back to the raw id.
    pub async fn member_names(&self, members: &[String]) -> Vec<MemberName> {
        stream::iter(members.iter().cloned())
            .map(|uid| async move {
                let name = match self.db.get_profile(&uid).await {
                    Ok(Some(profile)) if !profile.display_name.is_empty() => profile.display_name,
                    Ok(_) => uid.clone(),
                    Err(e) => {
                        tracing::debug!(uid = %uid, error = %e, "Profile lookup failed");
                        uid.clone()
                    }
                };
                MemberName { uid, name }
            })
            .buffered(MAX_CONCURRENT_PROFILE_LOOKUPS)
            .collect()
            .await
    }
}
