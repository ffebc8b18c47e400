// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team creation: validates a submission and writes the new team.

use crate::db::FirestoreDb;
use crate::error::{AppError, FieldErrors};
use crate::models::team::{DEFAULT_MAX_MEMBERS, MAX_MEMBERS, MIN_MEMBERS};
use crate::models::{Identity, Team};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// New-team form submission.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTeamRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Team name is required"))]
    pub team_name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Please select a sport"))]
    pub sport: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Location is required"))]
    pub location: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub max_members: Option<u32>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Check required fields. On failure returns every failing field with its message.
pub fn validate_new_team(request: &NewTeamRequest) -> Result<(), FieldErrors> {
    let Err(errors) = request.validate() else {
        return Ok(());
    };

    let fields = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let message = errs
                .first()?
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field));
            Some((camel_case(&field), message))
        })
        .collect();
    Err(fields)
}

/// Capacity from the form, defaulted and clamped to the allowed range.
pub fn effective_max_members(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_MAX_MEMBERS)
        .clamp(MIN_MEMBERS, MAX_MEMBERS)
}

/// Build the stored team for a validated submission.
///
/// The creator becomes the first and only member.
pub fn build_team(
    request: &NewTeamRequest,
    creator: &Identity,
    id: String,
    created_at: DateTime<Utc>,
) -> Team {
    Team {
        id,
        team_name: request.team_name.trim().to_string(),
        sport: request.sport.trim().to_string(),
        location: request.location.trim().to_string(),
        description: request.description.trim().to_string(),
        max_members: effective_max_members(request.max_members),
        members: vec![creator.uid.clone()],
        creator_id: creator.uid.clone(),
        creator_name: creator.creator_name(),
        created_at,
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Validates and persists new teams.
#[derive(Clone)]
pub struct TeamCreationService {
    db: FirestoreDb,
}

impl TeamCreationService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Create a team owned by `creator`. Nothing is written if validation fails.
    pub async fn create(
        &self,
        request: &NewTeamRequest,
        creator: &Identity,
    ) -> Result<Team, AppError> {
        validate_new_team(request).map_err(AppError::Validation)?;

        let id = uuid::Uuid::new_v4().simple().to_string();
        let team = build_team(request, creator, id, Utc::now());
        self.db.insert_team(&team).await?;

        tracing::info!(
            team_id = %team.id,
            creator = %creator.uid,
            sport = %team.sport,
            max_members = team.max_members,
            "Team created"
        );

        Ok(team)
    }
}
