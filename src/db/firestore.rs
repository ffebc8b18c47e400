// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Teams (directory listing, membership updates, creation and deletion)
//! - Users (profile storage used for member display names)

use crate::db::collections;
use crate::db::memory::MemoryStore;
use crate::error::AppError;
use crate::models::{Profile, Team};
use std::sync::Arc;

/// Result of a conditional team delete.
#[derive(Debug, Clone, PartialEq)]
pub enum TeamDelete {
    Deleted,
    /// The stored team failed the check; it is returned as read.
    Refused(Team),
    /// No team with that id.
    Missing,
}

/// Result of a conditional membership write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberUpdate {
    /// The member list changed.
    Applied,
    /// Already present (add) or already absent (remove).
    Unchanged,
    /// The team reached capacity before the add could be written.
    Full,
    /// No team with that id.
    Missing,
}

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
    Offline,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create an in-memory database (tests and local runs without GCP).
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    fn memory(&self) -> Option<&MemoryStore> {
        match &self.backend {
            Backend::Memory(store) => Some(store),
            _ => None,
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        match &self.backend {
            Backend::Firestore(client) => Ok(client),
            _ => Err(AppError::Database(
                "Database not connected (offline mode)".to_string(),
            )),
        }
    }

    // ─── Team Operations ─────────────────────────────────────────

    /// Get every team, newest first.
    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        if let Some(store) = self.memory() {
            return Ok(store.list_teams());
        }

        self.get_client()?
            .fluent()
            .select()
            .from(collections::TEAMS)
            .order_by([("createdAt", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a team by document ID.
    pub async fn get_team(&self, team_id: &str) -> Result<Option<Team>, AppError> {
        if let Some(store) = self.memory() {
            return Ok(store.get_team(team_id));
        }

        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TEAMS)
            .obj()
            .one(team_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a new team under `team.id`.
    pub async fn insert_team(&self, team: &Team) -> Result<(), AppError> {
        if let Some(store) = self.memory() {
            store.put_team(team);
            return Ok(());
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::TEAMS)
            .document_id(&team.id)
            .object(team)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a team if `allow` accepts its stored state.
    ///
    /// The check runs against a read inside the delete's transaction, so a
    /// member who joins after the caller's snapshot still blocks the delete.
    pub async fn delete_team_if<F>(&self, team_id: &str, allow: F) -> Result<TeamDelete, AppError>
    where
        F: FnOnce(&Team) -> bool,
    {
        if let Some(store) = self.memory() {
            return Ok(store.delete_team_if(team_id, allow));
        }

        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let Some(team) = Self::read_team_in_transaction(client, &transaction, team_id).await? else {
            let _ = transaction.rollback().await;
            return Ok(TeamDelete::Missing);
        };

        if !allow(&team) {
            let _ = transaction.rollback().await;
            return Ok(TeamDelete::Refused(team));
        }

        client
            .fluent()
            .delete()
            .from(collections::TEAMS)
            .document_id(team_id)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add delete to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::debug!(team_id, "Team deleted");
        Ok(TeamDelete::Deleted)
    }

    /// Add `uid` to a team's members unless it is already present or the team is full.
    ///
    /// The capacity check and the write share one transaction so two
    /// concurrent joins cannot push the team past `maxMembers`.
    pub async fn add_team_member(&self, team_id: &str, uid: &str) -> Result<MemberUpdate, AppError> {
        if let Some(store) = self.memory() {
            return Ok(store.add_member(team_id, uid));
        }

        self.update_members_atomic(team_id, |team| {
            if team.has_member(uid) {
                return MemberUpdate::Unchanged;
            }
            if team.is_full() {
                return MemberUpdate::Full;
            }
            team.members.push(uid.to_string());
            MemberUpdate::Applied
        })
        .await
    }

    /// Remove `uid` from a team's members.
    pub async fn remove_team_member(
        &self,
        team_id: &str,
        uid: &str,
    ) -> Result<MemberUpdate, AppError> {
        if let Some(store) = self.memory() {
            return Ok(store.remove_member(team_id, uid));
        }

        self.update_members_atomic(team_id, |team| {
            let before = team.members.len();
            team.members.retain(|m| m != uid);
            if team.members.len() == before {
                MemberUpdate::Unchanged
            } else {
                MemberUpdate::Applied
            }
        })
        .await
    }

    /// Read a team, apply `mutate` to its member list, and write it back in
    /// one transaction. Nothing is written unless `mutate` returns `Applied`.
    async fn update_members_atomic<F>(
        &self,
        team_id: &str,
        mutate: F,
    ) -> Result<MemberUpdate, AppError>
    where
        F: FnOnce(&mut Team) -> MemberUpdate,
    {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let current = Self::read_team_in_transaction(client, &transaction, team_id).await?;

        let Some(mut team) = current else {
            let _ = transaction.rollback().await;
            return Ok(MemberUpdate::Missing);
        };

        let update = mutate(&mut team);
        if update != MemberUpdate::Applied {
            let _ = transaction.rollback().await;
            return Ok(update);
        }

        client
            .fluent()
            .update()
            .in_col(collections::TEAMS)
            .document_id(team_id)
            .object(&team)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add team to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::debug!(
            team_id,
            members = team.members.len(),
            "Team members updated"
        );

        Ok(update)
    }

    /// Read a team as part of `transaction`; commit fails if it changes underneath.
    async fn read_team_in_transaction(
        client: &firestore::FirestoreDb,
        transaction: &firestore::FirestoreTransaction<'_>,
        team_id: &str,
    ) -> Result<Option<Team>, AppError> {
        let reader = client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        );
        reader
            .fluent()
            .select()
            .by_id_in(collections::TEAMS)
            .obj()
            .one(team_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read team in transaction: {}", e)))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a user profile by uid.
    pub async fn get_profile(&self, uid: &str) -> Result<Option<Profile>, AppError> {
        if let Some(store) = self.memory() {
            return Ok(store.get_profile(uid));
        }

        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user profile.
    pub async fn upsert_profile(&self, uid: &str, profile: &Profile) -> Result<(), AppError> {
        if let Some(store) = self.memory() {
            store.put_profile(uid, profile);
            return Ok(());
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
