// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store with the same semantics as the Firestore
//! collections, used for tests and for running locally without GCP.

use crate::db::{MemberUpdate, TeamDelete};
use crate::models::{Profile, Team};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Team and profile documents held in memory.
#[derive(Default)]
pub struct MemoryStore {
    teams: DashMap<String, Team>,
    profiles: DashMap<String, Profile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All teams, newest first.
    pub fn list_teams(&self) -> Vec<Team> {
        let mut teams: Vec<Team> = self.teams.iter().map(|t| t.value().clone()).collect();
        teams.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        teams
    }

    pub fn get_team(&self, team_id: &str) -> Option<Team> {
        self.teams.get(team_id).map(|t| t.value().clone())
    }

    pub fn put_team(&self, team: &Team) {
        self.teams.insert(team.id.clone(), team.clone());
    }

    /// Remove a team if `allow` accepts it, checked under the entry lock.
    pub fn delete_team_if<F>(&self, team_id: &str, allow: F) -> TeamDelete
    where
        F: FnOnce(&Team) -> bool,
    {
        match self.teams.entry(team_id.to_string()) {
            Entry::Occupied(entry) if allow(entry.get()) => {
                entry.remove();
                TeamDelete::Deleted
            }
            Entry::Occupied(entry) => TeamDelete::Refused(entry.get().clone()),
            Entry::Vacant(_) => TeamDelete::Missing,
        }
    }

    /// Set-union add, refused once the team is at capacity.
    ///
    /// The entry lock makes the capacity check and the write one step.
    pub fn add_member(&self, team_id: &str, uid: &str) -> MemberUpdate {
        let Some(mut team) = self.teams.get_mut(team_id) else {
            return MemberUpdate::Missing;
        };
        if team.has_member(uid) {
            return MemberUpdate::Unchanged;
        }
        if team.is_full() {
            return MemberUpdate::Full;
        }
        team.members.push(uid.to_string());
        MemberUpdate::Applied
    }

    /// Set-difference removal.
    pub fn remove_member(&self, team_id: &str, uid: &str) -> MemberUpdate {
        let Some(mut team) = self.teams.get_mut(team_id) else {
            return MemberUpdate::Missing;
        };
        let before = team.members.len();
        team.members.retain(|m| m != uid);
        if team.members.len() == before {
            MemberUpdate::Unchanged
        } else {
            MemberUpdate::Applied
        }
    }

    pub fn get_profile(&self, uid: &str) -> Option<Profile> {
        self.profiles.get(uid).map(|p| p.value().clone())
    }

    pub fn put_profile(&self, uid: &str, profile: &Profile) {
        self.profiles.insert(uid.to_string(), profile.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn team(id: &str, day: u32, members: &[&str], max_members: u32) -> Team {
        Team {
            id: id.to_string(),
            team_name: format!("Team {}", id),
            sport: "Tennis".to_string(),
            location: "Palo Alto".to_string(),
            description: "Doubles".to_string(),
            max_members,
            members: members.iter().map(|m| m.to_string()).collect(),
            creator_id: members.first().unwrap_or(&"nobody").to_string(),
            creator_name: "Creator".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_list_newest_first() {
        let store = MemoryStore::new();
        store.put_team(&team("old", 1, &["a"], 4));
        store.put_team(&team("new", 3, &["a"], 4));
        store.put_team(&team("mid", 2, &["a"], 4));

        let ids: Vec<_> = store.list_teams().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_add_member_is_set_union() {
        let store = MemoryStore::new();
        store.put_team(&team("t", 1, &["a"], 3));

        assert_eq!(store.add_member("t", "b"), MemberUpdate::Applied);
        assert_eq!(store.add_member("t", "b"), MemberUpdate::Unchanged);
        assert_eq!(store.get_team("t").unwrap().members, vec!["a", "b"]);
    }

    #[test]
    fn test_add_member_refuses_at_capacity() {
        let store = MemoryStore::new();
        store.put_team(&team("t", 1, &["a", "b"], 2));

        assert_eq!(store.add_member("t", "c"), MemberUpdate::Full);
        assert_eq!(store.get_team("t").unwrap().members.len(), 2);
        assert_eq!(store.add_member("missing", "c"), MemberUpdate::Missing);
    }

    #[test]
    fn test_remove_member() {
        let store = MemoryStore::new();
        store.put_team(&team("t", 1, &["a", "b"], 2));

        assert_eq!(store.remove_member("t", "b"), MemberUpdate::Applied);
        assert_eq!(store.remove_member("t", "b"), MemberUpdate::Unchanged);
        assert_eq!(store.get_team("t").unwrap().members, vec!["a"]);
    }

    #[test]
    fn test_conditional_delete_checks_stored_team() {
        let store = MemoryStore::new();
        store.put_team(&team("t", 1, &["a"], 3));
        store.add_member("t", "b");

        let refused = store.delete_team_if("t", |t| t.other_members().next().is_none());
        match refused {
            TeamDelete::Refused(t) => assert_eq!(t.members, vec!["a", "b"]),
            other => panic!("expected refusal, got {:?}", other),
        }
        assert!(store.get_team("t").is_some());

        assert_eq!(store.delete_team_if("t", |_| true), TeamDelete::Deleted);
        assert_eq!(store.delete_team_if("t", |_| true), TeamDelete::Missing);
    }
}
