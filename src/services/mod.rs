// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod creation;
pub mod directory;
pub mod membership;
pub mod session;

pub use auth::AuthService;
pub use creation::{NewTeamRequest, TeamCreationService};
pub use directory::{DirectoryService, TeamFilter};
pub use membership::{DeletePolicy, MembershipEngine, TeamAction};
pub use session::SessionHolder;
