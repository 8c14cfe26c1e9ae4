// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Profiles (`users/{uid}`)
//! - Expense list snapshots (`users/{uid}/expense_lists/{id}`)
//!
//! Besides Firestore, the wrapper can run against an in-memory map (local
//! development and tests) or fully offline, where every call fails.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{ExpenseList, UserProfile};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
    Offline,
}

#[derive(Default)]
struct MemoryStore {
    profiles: DashMap<String, UserProfile>,
    /// Keyed by (uid, list id)
    expense_lists: DashMap<(String, String), ExpenseList>,
}

/// Document store client.
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

    /// Create an in-memory store. Data lives as long as the process.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::default())),
        }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    fn offline() -> AppError {
        AppError::Database("Database not connected (offline mode)".to_string())
    }

    fn expense_parent(
        client: &firestore::FirestoreDb,
        uid: &str,
    ) -> Result<firestore::ParentPathBuilder, AppError> {
        client
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by user ID.
    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::USERS)
                .obj()
                .one(uid)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(store) => Ok(store.profiles.get(uid).map(|p| p.clone())),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Create or replace a profile.
    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .document_id(&profile.uid)
                    .object(profile)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.profiles.insert(profile.uid.clone(), profile.clone());
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    // ─── Expense List Operations ─────────────────────────────────

    /// Store a new expense list snapshot under the user.
    pub async fn insert_expense_list(&self, uid: &str, list: &ExpenseList) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent_path = Self::expense_parent(client, uid)?;
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::EXPENSE_LISTS)
                    .document_id(&list.id)
                    .parent(&parent_path)
                    .object(list)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store
                    .expense_lists
                    .insert((uid.to_string(), list.id.clone()), list.clone());
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// All expense lists for a user, in no particular order.
    pub async fn get_expense_lists(&self, uid: &str) -> Result<Vec<ExpenseList>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent_path = Self::expense_parent(client, uid)?;
                client
                    .fluent()
                    .select()
                    .from(collections::EXPENSE_LISTS)
                    .parent(&parent_path)
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => Ok(store
                .expense_lists
                .iter()
                .filter(|entry| entry.key().0 == uid)
                .map(|entry| entry.value().clone())
                .collect()),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Delete one expense list. Deleting a missing document succeeds.
    pub async fn delete_expense_list(&self, uid: &str, list_id: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent_path = Self::expense_parent(client, uid)?;
                client
                    .fluent()
                    .delete()
                    .from(collections::EXPENSE_LISTS)
                    .document_id(list_id)
                    .parent(&parent_path)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store
                    .expense_lists
                    .remove(&(uid.to_string(), list_id.to_string()));
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseItem;

    fn list() -> ExpenseList {
        ExpenseList::new(vec![ExpenseItem {
            name: "Groceries".to_string(),
            price: 450.0,
            quantity: 2.0,
        }])
    }

    #[tokio::test]
    async fn test_memory_lists_are_scoped_per_user() {
        let db = FirestoreDb::new_in_memory();
        let a = list();
        let b = list();

        db.insert_expense_list("alice", &a).await.unwrap();
        db.insert_expense_list("bob", &b).await.unwrap();

        let alice = db.get_expense_lists("alice").await.unwrap();
        assert_eq!(alice, vec![a.clone()]);

        db.delete_expense_list("bob", &a.id).await.unwrap();
        assert_eq!(db.get_expense_lists("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_fails_with_database_error() {
        let db = FirestoreDb::new_mock();
        let result = db.get_profile("anyone").await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
