// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users and delegated-login sessions
//! - Treatments, clinics and the clinic-treatment join collection
//! - Wholesale catalogue replacement (seeding)

use super::{collections, is_valid_document_id, limits, ClinicQuery};
use crate::error::AppError;
use crate::models::{Clinic, ClinicTreatment, Session, Treatment, User};
use serde::{Deserialize, Serialize};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
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

        Ok(Self { client })
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

        Ok(Self { client })
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        if !is_valid_document_id(user_id) {
            return Ok(None);
        }
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the user registered with an exact email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.field("email").eq(email))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.user_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Session Operations ──────────────────────────────────────

    /// Get a session by its token (the document ID).
    pub async fn get_session(&self, token: &str) -> Result<Option<Session>, AppError> {
        if !is_valid_document_id(token) {
            return Ok(None);
        }
        self.client
            .fluent()
            .select()
            .by_id_in(collections::SESSIONS)
            .obj()
            .one(token)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a session keyed by its token.
    pub async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::SESSIONS)
            .document_id(&session.session_token)
            .object(session)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a session (no-op if it does not exist).
    pub async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        if !is_valid_document_id(token) {
            return Ok(());
        }
        self.client
            .fluent()
            .delete()
            .from(collections::SESSIONS)
            .document_id(token)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Treatment Operations ────────────────────────────────────

    pub async fn list_treatments(&self) -> Result<Vec<Treatment>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::TREATMENTS)
            .limit(limits::TREATMENTS as u32)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_treatment(&self, treatment_id: &str) -> Result<Option<Treatment>, AppError> {
        if !is_valid_document_id(treatment_id) {
            return Ok(None);
        }
        self.client
            .fluent()
            .select()
            .by_id_in(collections::TREATMENTS)
            .obj()
            .one(treatment_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Clinic Operations ───────────────────────────────────────

    /// Query clinics by minimum rating server-side, then apply the city filter.
    ///
    /// Firestore has no case-insensitive substring operator, so the city match
    /// runs here over at most [`limits::CLINIC_SCAN`] documents.
    pub async fn query_clinics(&self, query: &ClinicQuery) -> Result<Vec<Clinic>, AppError> {
        let min_rating = query.min_rating;

        let mut clinics: Vec<Clinic> = self
            .client
            .fluent()
            .select()
            .from(collections::CLINICS)
            .filter(move |q| min_rating.and_then(|r| q.field("rating").greater_than_or_equal(r)))
            .limit(limits::CLINIC_SCAN as u32)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // An inequality filter makes Firestore order by rating; restore ID order.
        clinics.sort_by(|a, b| a.clinic_id.cmp(&b.clinic_id));
        clinics.retain(|c| query.matches_city(c));
        clinics.truncate(limits::CLINICS);
        Ok(clinics)
    }

    pub async fn get_clinic(&self, clinic_id: &str) -> Result<Option<Clinic>, AppError> {
        if !is_valid_document_id(clinic_id) {
            return Ok(None);
        }
        self.client
            .fluent()
            .select()
            .by_id_in(collections::CLINICS)
            .obj()
            .one(clinic_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn clinic_cities(&self) -> Result<Vec<String>, AppError> {
        let clinics: Vec<Clinic> = self
            .client
            .fluent()
            .select()
            .from(collections::CLINICS)
            .limit(limits::CITY_SCAN as u32)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(clinics.into_iter().map(|c| c.city).collect())
    }

    // ─── Clinic-Treatment Join Operations ────────────────────────

    pub async fn links_for_treatment(
        &self,
        treatment_id: &str,
    ) -> Result<Vec<ClinicTreatment>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::CLINIC_TREATMENTS)
            .filter(|q| q.field("treatment_id").eq(treatment_id))
            .limit(limits::LINKS_PER_TREATMENT as u32)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn links_for_clinic(&self, clinic_id: &str) -> Result<Vec<ClinicTreatment>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::CLINIC_TREATMENTS)
            .filter(|q| q.field("clinic_id").eq(clinic_id))
            .limit(limits::LINKS_PER_CLINIC as u32)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn find_link(
        &self,
        clinic_id: &str,
        treatment_id: &str,
    ) -> Result<Option<ClinicTreatment>, AppError> {
        let links: Vec<ClinicTreatment> = self
            .client
            .fluent()
            .select()
            .from(collections::CLINIC_TREATMENTS)
            .filter(|q| {
                q.for_all([
                    q.field("clinic_id").eq(clinic_id),
                    q.field("treatment_id").eq(treatment_id),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(links.into_iter().next())
    }

    // ─── Catalogue Replacement ───────────────────────────────────

    /// Replace the whole catalogue.
    ///
    /// Deletes and writes run in transactions of at most [`BATCH_SIZE`]
    /// operations; the replacement as a whole is not atomic.
    pub async fn replace_catalog(
        &self,
        treatments: &[Treatment],
        clinics: &[Clinic],
        links: &[ClinicTreatment],
    ) -> Result<(), AppError> {
        let old_links: Vec<ClinicTreatment> = self.list_all(collections::CLINIC_TREATMENTS).await?;
        self.batch_delete(&old_links, collections::CLINIC_TREATMENTS, |l| l.id.clone())
            .await?;

        let old_clinics: Vec<Clinic> = self.list_all(collections::CLINICS).await?;
        self.batch_delete(&old_clinics, collections::CLINICS, |c| c.clinic_id.clone())
            .await?;

        let old_treatments: Vec<Treatment> = self.list_all(collections::TREATMENTS).await?;
        self.batch_delete(&old_treatments, collections::TREATMENTS, |t| {
            t.treatment_id.clone()
        })
        .await?;

        tracing::debug!(
            links = old_links.len(),
            clinics = old_clinics.len(),
            treatments = old_treatments.len(),
            "Cleared existing catalogue"
        );

        self.batch_write(treatments, collections::TREATMENTS, |t| {
            t.treatment_id.clone()
        })
        .await?;
        self.batch_write(clinics, collections::CLINICS, |c| c.clinic_id.clone())
            .await?;
        self.batch_write(links, collections::CLINIC_TREATMENTS, |l| l.id.clone())
            .await?;

        Ok(())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Read every document of a collection.
    async fn list_all<T>(&self, collection: &str) -> Result<Vec<T>, AppError>
    where
        for<'de> T: serde::Deserialize<'de> + Send,
    {
        self.client
            .fluent()
            .select()
            .from(collection)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = self
                .client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                self.client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    /// Helper to batch write documents using transactions.
    async fn batch_write<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        T: Serialize + for<'de> Deserialize<'de> + Sync + Send,
        F: Fn(&T) -> String,
    {
        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = self
                .client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                self.client
                    .fluent()
                    .update()
                    .in_col(collection)
                    .document_id(&doc_id)
                    .object(item)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add write to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch write: {}", e))
            })?;
        }

        tracing::debug!(collection, count = items.len(), "Batch write complete");
        Ok(())
    }
}
