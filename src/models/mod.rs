// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod sport;
pub mod team;
pub mod user;

pub use sport::Sport;
pub use team::Team;
pub use user::{Identity, Profile};
