// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team membership engine.
//!
//! Given a team snapshot and the viewer, decides which of join, quit and
//! delete are available and performs the chosen transition. Every mutation
//! is followed by a re-read of the team so callers render store state, not
//! the local guess.
//!
//! Per team and viewer the states are non-member, member and creator:
//! - non-member -> member: join, while the team is not full
//! - member -> non-member: quit
//! - creator -> (team removed): delete

use crate::db::{FirestoreDb, MemberUpdate, TeamDelete};
use crate::error::AppError;
use crate::models::{Identity, Team};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which creators may delete their team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// The creator can always delete.
    #[default]
    CreatorOnly,
    /// The creator can delete only once no other members remain.
    RequireNoOtherMembers,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creator-only" => Ok(DeletePolicy::CreatorOnly),
            "require-empty" => Ok(DeletePolicy::RequireNoOtherMembers),
            other => Err(format!("unknown delete policy '{}'", other)),
        }
    }
}

/// Actions a viewer can take on a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TeamAction {
    Join,
    Quit,
    Delete,
}

impl TeamAction {
    /// Lead-in for messages reporting a failed store call.
    pub fn error_prefix(self) -> &'static str {
        match self {
            TeamAction::Join => "Error joining team",
            TeamAction::Quit => "Error quitting team",
            TeamAction::Delete => "Error deleting team",
        }
    }
}

/// Viewer's relationship to a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamAccess {
    pub signed_in: bool,
    pub is_member: bool,
    pub is_creator: bool,
    pub is_full: bool,
    has_other_members: bool,
}

impl TeamAccess {
    pub fn evaluate(team: &Team, viewer: Option<&Identity>) -> Self {
        let (is_member, is_creator) = match viewer {
            Some(v) => (team.has_member(&v.uid), team.is_creator(&v.uid)),
            None => (false, false),
        };
        Self {
            signed_in: viewer.is_some(),
            is_member,
            is_creator,
            is_full: team.is_full(),
            has_other_members: team.other_members().next().is_some(),
        }
    }

    pub fn can_join(&self) -> bool {
        self.signed_in && !self.is_member && !self.is_creator && !self.is_full
    }

    pub fn can_quit(&self) -> bool {
        self.signed_in && self.is_member && !self.is_creator
    }

    pub fn can_delete(&self, policy: DeletePolicy) -> bool {
        self.signed_in
            && self.is_creator
            && (policy == DeletePolicy::CreatorOnly || !self.has_other_members)
    }

    /// Actions to offer; empty means view only.
    pub fn available_actions(&self, policy: DeletePolicy) -> Vec<TeamAction> {
        let mut actions = Vec::new();
        if self.can_join() {
            actions.push(TeamAction::Join);
        }
        if self.can_quit() {
            actions.push(TeamAction::Quit);
        }
        if self.can_delete(policy) {
            actions.push(TeamAction::Delete);
        }
        actions
    }
}

/// Why an action was refused without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotSignedIn(TeamAction),
    AlreadyMember,
    CreatorCannotJoin,
    TeamFull,
    NotMember,
    CreatorCannotQuit,
    NotCreator,
    HasOtherMembers,
    TeamNotFound,
}

impl Rejection {
    pub fn message(self) -> &'static str {
        match self {
            Rejection::NotSignedIn(TeamAction::Join) => "Please log in to join teams",
            Rejection::NotSignedIn(TeamAction::Quit) => "Please log in to quit teams",
            Rejection::NotSignedIn(TeamAction::Delete) => "Please log in to delete teams",
            Rejection::AlreadyMember => "You are already a member of this team",
            Rejection::CreatorCannotJoin => "You created this team and are already on it",
            Rejection::TeamFull => "This team is full",
            Rejection::NotMember => "You are not a member of this team",
            Rejection::CreatorCannotQuit => "Team creators cannot quit their own team",
            Rejection::NotCreator => "Only the team creator can delete this team",
            Rejection::HasOtherMembers => {
                "Teams with other members cannot be deleted; wait until everyone has left"
            }
            Rejection::TeamNotFound => "Team not found",
        }
    }

    /// Privilege rejections, as opposed to state rejections.
    pub fn is_permission(self) -> bool {
        matches!(
            self,
            Rejection::CreatorCannotJoin | Rejection::CreatorCannotQuit | Rejection::NotCreator
        )
    }
}

/// How an action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    Rejected(Rejection),
    /// The store call failed; the message is the store's error.
    Failed(String),
}

/// Result of a membership action, always with a message for the viewer.
#[derive(Debug, Clone)]
pub struct ActionReport {
    pub action: TeamAction,
    pub outcome: ActionOutcome,
    pub message: String,
    /// Team as re-read after the action; `None` once deleted or missing.
    pub team: Option<Team>,
}

impl ActionReport {
    fn rejected(action: TeamAction, rejection: Rejection, team: Option<Team>) -> Self {
        tracing::debug!(?action, ?rejection, "Membership action rejected");
        Self {
            action,
            outcome: ActionOutcome::Rejected(rejection),
            message: rejection.message().to_string(),
            team,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.outcome == ActionOutcome::Applied
    }
}

/// Applies join/quit/delete to team documents.
#[derive(Clone)]
pub struct MembershipEngine {
    db: FirestoreDb,
    delete_policy: DeletePolicy,
}

impl MembershipEngine {
    pub fn new(db: FirestoreDb, delete_policy: DeletePolicy) -> Self {
        Self { db, delete_policy }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    /// Load the team and run `action` against it.
    pub async fn perform(
        &self,
        action: TeamAction,
        team_id: &str,
        viewer: Option<&Identity>,
    ) -> ActionReport {
        let team = match self.db.get_team(team_id).await {
            Ok(Some(team)) => team,
            Ok(None) => return ActionReport::rejected(action, Rejection::TeamNotFound, None),
            Err(e) => return failed(action, &e, None),
        };

        match action {
            TeamAction::Join => self.join(&team, viewer).await,
            TeamAction::Quit => self.quit(&team, viewer).await,
            TeamAction::Delete => self.delete(&team, viewer).await,
        }
    }

    /// Add the viewer to the team.
    pub async fn join(&self, team: &Team, viewer: Option<&Identity>) -> ActionReport {
        let action = TeamAction::Join;
        let Some(viewer) = viewer else {
            return ActionReport::rejected(action, Rejection::NotSignedIn(action), Some(team.clone()));
        };

        let access = TeamAccess::evaluate(team, Some(viewer));
        let rejection = if access.is_member {
            Some(Rejection::AlreadyMember)
        } else if access.is_creator {
            Some(Rejection::CreatorCannotJoin)
        } else if access.is_full {
            Some(Rejection::TeamFull)
        } else {
            None
        };
        if let Some(rejection) = rejection {
            return ActionReport::rejected(action, rejection, Some(team.clone()));
        }

        match self.db.add_team_member(&team.id, &viewer.uid).await {
            Ok(MemberUpdate::Applied) | Ok(MemberUpdate::Unchanged) => {
                tracing::info!(team_id = %team.id, uid = %viewer.uid, "Joined team");
                self.applied(action, "You have joined the team!", team).await
            }
            Ok(MemberUpdate::Full) => {
                // Another join won the last slot after our snapshot was taken
                let refreshed = self.refresh(team).await;
                ActionReport::rejected(action, Rejection::TeamFull, refreshed)
            }
            Ok(MemberUpdate::Missing) => {
                ActionReport::rejected(action, Rejection::TeamNotFound, None)
            }
            Err(e) => failed(action, &e, Some(team.clone())),
        }
    }

    /// Remove the viewer from the team.
    pub async fn quit(&self, team: &Team, viewer: Option<&Identity>) -> ActionReport {
        let action = TeamAction::Quit;
        let Some(viewer) = viewer else {
            return ActionReport::rejected(action, Rejection::NotSignedIn(action), Some(team.clone()));
        };

        let access = TeamAccess::evaluate(team, Some(viewer));
        if access.is_creator {
            return ActionReport::rejected(action, Rejection::CreatorCannotQuit, Some(team.clone()));
        }
        if !access.is_member {
            return ActionReport::rejected(action, Rejection::NotMember, Some(team.clone()));
        }

        match self.db.remove_team_member(&team.id, &viewer.uid).await {
            Ok(MemberUpdate::Missing) => {
                ActionReport::rejected(action, Rejection::TeamNotFound, None)
            }
            Ok(_) => {
                tracing::info!(team_id = %team.id, uid = %viewer.uid, "Quit team");
                self.applied(action, "You have quit the team.", team).await
            }
            Err(e) => failed(action, &e, Some(team.clone())),
        }
    }

    /// Delete the team. Only its creator may do this.
    pub async fn delete(&self, team: &Team, viewer: Option<&Identity>) -> ActionReport {
        let action = TeamAction::Delete;
        let Some(viewer) = viewer else {
            return ActionReport::rejected(action, Rejection::NotSignedIn(action), Some(team.clone()));
        };

        let access = TeamAccess::evaluate(team, Some(viewer));
        if !access.is_creator {
            return ActionReport::rejected(action, Rejection::NotCreator, Some(team.clone()));
        }
        if !access.can_delete(self.delete_policy) {
            return ActionReport::rejected(action, Rejection::HasOtherMembers, Some(team.clone()));
        }

        // Re-checked against the stored team; a member may have joined since `team` was read
        let policy = self.delete_policy;
        let uid = viewer.uid.as_str();
        let allow = |stored: &Team| TeamAccess::evaluate(stored, Some(viewer)).can_delete(policy);

        match self.db.delete_team_if(&team.id, allow).await {
            Ok(TeamDelete::Deleted) => {
                tracing::info!(team_id = %team.id, uid, "Deleted team");
                ActionReport {
                    action,
                    outcome: ActionOutcome::Applied,
                    message: "Team deleted.".to_string(),
                    team: None,
                }
            }
            Ok(TeamDelete::Refused(stored)) => {
                let rejection = if stored.is_creator(uid) {
                    Rejection::HasOtherMembers
                } else {
                    Rejection::NotCreator
                };
                ActionReport::rejected(action, rejection, Some(stored))
            }
            Ok(TeamDelete::Missing) => {
                ActionReport::rejected(action, Rejection::TeamNotFound, None)
            }
            Err(e) => failed(action, &e, Some(team.clone())),
        }
    }

    async fn applied(&self, action: TeamAction, message: &str, team: &Team) -> ActionReport {
        ActionReport {
            action,
            outcome: ActionOutcome::Applied,
            message: message.to_string(),
            team: self.refresh(team).await,
        }
    }

    /// Re-read a team after a write. A failed read keeps the old snapshot.
    async fn refresh(&self, team: &Team) -> Option<Team> {
        match self.db.get_team(&team.id).await {
            Ok(latest) => latest,
            Err(e) => {
                tracing::warn!(team_id = %team.id, error = %e, "Failed to re-read team");
                Some(team.clone())
            }
        }
    }
}

fn failed(action: TeamAction, error: &AppError, team: Option<Team>) -> ActionReport {
    let message = format!("{}: {}", action.error_prefix(), error);
    tracing::warn!(?action, error = %message, "Membership action failed");
    ActionReport {
        action,
        outcome: ActionOutcome::Failed(message.clone()),
        message,
        team,
    }
}
