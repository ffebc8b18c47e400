// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The fixed set of sports a team can be created for.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Glyph shown for sports outside the enumerated set.
pub const FALLBACK_ICON: &str = "🏆";

/// Directory filter value that matches every sport.
pub const ALL_SPORTS: &str = "All";

/// Sports offered by the team creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Sport {
    Football,
    Basketball,
    Tennis,
    Volleyball,
    Cricket,
    Baseball,
    Hockey,
    Rugby,
    Badminton,
    #[serde(rename = "Table Tennis")]
    TableTennis,
    Swimming,
    Athletics,
    Golf,
    Soccer,
    Other,
}

impl Sport {
    /// All sports, in form display order.
    pub const ALL: [Sport; 15] = [
        Sport::Football,
        Sport::Basketball,
        Sport::Tennis,
        Sport::Volleyball,
        Sport::Cricket,
        Sport::Baseball,
        Sport::Hockey,
        Sport::Rugby,
        Sport::Badminton,
        Sport::TableTennis,
        Sport::Swimming,
        Sport::Athletics,
        Sport::Golf,
        Sport::Soccer,
        Sport::Other,
    ];

    /// Name as stored in the `sport` field of a team document.
    pub fn name(self) -> &'static str {
        match self {
            Sport::Football => "Football",
            Sport::Basketball => "Basketball",
            Sport::Tennis => "Tennis",
            Sport::Volleyball => "Volleyball",
            Sport::Cricket => "Cricket",
            Sport::Baseball => "Baseball",
            Sport::Hockey => "Hockey",
            Sport::Rugby => "Rugby",
            Sport::Badminton => "Badminton",
            Sport::TableTennis => "Table Tennis",
            Sport::Swimming => "Swimming",
            Sport::Athletics => "Athletics",
            Sport::Golf => "Golf",
            Sport::Soccer => "Soccer",
            Sport::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Sport::Football | Sport::Soccer => "⚽",
            Sport::Basketball => "🏀",
            Sport::Tennis => "🎾",
            Sport::Volleyball => "🏐",
            Sport::Cricket => "🏏",
            Sport::Baseball => "⚾",
            Sport::Hockey => "🏒",
            Sport::Rugby => "🏉",
            Sport::Badminton => "🏸",
            Sport::TableTennis => "🏓",
            Sport::Swimming => "🏊‍♂️",
            Sport::Athletics => "🏃‍♂️",
            Sport::Golf => "⛳",
            Sport::Other => FALLBACK_ICON,
        }
    }

    /// Look up a sport by its stored name (exact match).
    pub fn from_name(name: &str) -> Option<Sport> {
        Sport::ALL.into_iter().find(|sport| sport.name() == name)
    }
}
