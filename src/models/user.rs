//! Identity and profile models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Creator name used when an identity has neither display name nor email.
pub const UNKNOWN_CREATOR: &str = "Unknown";

/// An authenticated user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Identity {
    /// Provider-assigned user id
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    /// Name recorded as a team's `creatorName`: display name, then email, then "Unknown".
    pub fn creator_name(&self) -> String {
        non_blank(self.display_name.as_deref())
            .or_else(|| non_blank(self.email.as_deref()))
            .unwrap_or(UNKNOWN_CREATOR)
            .to_string()
    }
}

/// User profile stored in Firestore (`users/{uid}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
}

impl Profile {
    /// Profile written on sign-in: the explicitly given name wins over the provider's.
    pub fn for_identity(identity: &Identity, given_name: Option<&str>) -> Self {
        Self {
            display_name: non_blank(given_name)
                .or_else(|| non_blank(identity.display_name.as_deref()))
                .unwrap_or_default()
                .to_string(),
            email: identity.email.clone().unwrap_or_default(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: Option<&str>, email: Option<&str>) -> Identity {
        Identity {
            uid: "u1".to_string(),
            display_name: name.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_creator_name_fallbacks() {
        assert_eq!(
            identity(Some("Ana"), Some("ana@example.com")).creator_name(),
            "Ana"
        );
        assert_eq!(
            identity(None, Some("ana@example.com")).creator_name(),
            "ana@example.com"
        );
        assert_eq!(
            identity(Some(""), Some("ana@example.com")).creator_name(),
            "ana@example.com"
        );
        assert_eq!(identity(None, None).creator_name(), "Unknown");
    }

    #[test]
    fn test_profile_prefers_given_name() {
        let id = identity(Some("Provider Name"), None);
        let profile = Profile::for_identity(&id, Some("Chosen"));
        assert_eq!(profile.display_name, "Chosen");
        assert_eq!(profile.email, "");

        let profile = Profile::for_identity(&id, None);
        assert_eq!(profile.display_name, "Provider Name");
    }
}
