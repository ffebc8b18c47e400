//! Team model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Smallest team the creation form allows.
pub const MIN_MEMBERS: u32 = 2;
/// Largest team the creation form allows.
pub const MAX_MEMBERS: u32 = 100;
/// Capacity used when a submission leaves it out.
pub const DEFAULT_MAX_MEMBERS: u32 = 10;

/// Team stored in Firestore (`teams/{id}`).
///
/// Field names are camelCase in the document and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Team {
    /// Document ID
    pub id: String,
    pub team_name: String,
    /// Sport name; normally one of `Sport::ALL` but not enforced
    pub sport: String,
    pub location: String,
    pub description: String,
    pub max_members: u32,
    /// Member uids, creator first
    #[serde(default)]
    pub members: Vec<String>,
    pub creator_id: String,
    #[serde(default)]
    pub creator_name: String,
    /// Creation time; a Firestore timestamp in the document, RFC 3339 on the wire
    #[serde(with = "firestore::serialize_as_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn has_member(&self, uid: &str) -> bool {
        self.members.iter().any(|m| m == uid)
    }

    pub fn is_creator(&self, uid: &str) -> bool {
        self.creator_id == uid
    }

    /// A team is full once its member count reaches `max_members`.
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_members as usize
    }

    /// Members other than the creator.
    pub fn other_members(&self) -> impl Iterator<Item = &String> {
        self.members.iter().filter(move |m| **m != self.creator_id)
    }
}
