// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! PlayPal: find, create and join local sports teams
//!
//! This crate provides the backend API: authentication, the team directory,
//! team creation and the membership rules for joining, quitting and
//! deleting teams.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{AuthService, DirectoryService, MembershipEngine, TeamCreationService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub auth: AuthService,
    pub directory: DirectoryService,
    pub membership: MembershipEngine,
    pub creation: TeamCreationService,
}

impl AppState {
    /// Wire the services over one database handle.
    pub fn new(config: Config, db: FirestoreDb, auth: AuthService) -> Self {
        let membership = MembershipEngine::new(db.clone(), config.delete_policy);
        Self {
            directory: DirectoryService::new(db.clone()),
            creation: TeamCreationService::new(db.clone()),
            membership,
            config,
            db,
            auth,
        }
    }
}
