// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Db`] is the single store handle passed to every component. It is backed
//! either by Firestore or by an in-process map store; both return documents in
//! identifier order.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;
pub use self::memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Clinic, ClinicTreatment, Session, Treatment, User};
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const SESSIONS: &str = "user_sessions";
    pub const TREATMENTS: &str = "treatments";
    pub const CLINICS: &str = "clinics";
    pub const CLINIC_TREATMENTS: &str = "clinic_treatments";
}

/// Fixed result caps for list queries.
pub mod limits {
    pub const TREATMENTS: usize = 100;
    pub const CLINICS: usize = 100;
    /// Clinics scanned when the city filter has to be applied client-side
    pub const CLINIC_SCAN: usize = 1000;
    pub const LINKS_PER_TREATMENT: usize = 1000;
    pub const LINKS_PER_CLINIC: usize = 100;
    pub const CITY_SCAN: usize = 1000;
}

/// Longest document ID Firestore accepts, in bytes.
pub const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// Whether `id` can name a Firestore document.
///
/// Lookups keyed by caller-supplied values (credentials, path parameters)
/// check this first so a malformed key reads as a miss instead of a store
/// error.
pub fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_DOCUMENT_ID_BYTES
        && !id.contains('/')
        && id != "."
        && id != ".."
        && !(id.len() >= 4 && id.starts_with("__") && id.ends_with("__"))
}

/// Clinic filters applied by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClinicQuery {
    /// Case-insensitive substring of the city name
    pub city: Option<String>,
    /// Inclusive lower bound on rating
    pub min_rating: Option<f64>,
}

impl ClinicQuery {
    pub fn matches_city(&self, clinic: &Clinic) -> bool {
        match &self.city {
            Some(needle) => clinic
                .city
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }

    pub fn matches(&self, clinic: &Clinic) -> bool {
        self.matches_city(clinic) && self.min_rating.map_or(true, |r| clinic.rating >= r)
    }
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreDb),
    Memory(Arc<MemoryDb>),
}

/// Shared store handle.
#[derive(Clone)]
pub struct Db {
    backend: Backend,
}

impl Db {
    /// Connect to Firestore for the given project.
    pub async fn firestore(project_id: &str) -> Result<Self, AppError> {
        Ok(Self {
            backend: Backend::Firestore(FirestoreDb::new(project_id).await?),
        })
    }

    /// Create an empty in-process store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryDb::default())),
        }
    }

    // ─── Users ───────────────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.get_user(user_id).await,
            Backend::Memory(db) => Ok(db.get_user(user_id)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.find_user_by_email(email).await,
            Backend::Memory(db) => Ok(db.find_user_by_email(email)),
        }
    }

    /// Create or replace a user document.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.upsert_user(user).await,
            Backend::Memory(db) => {
                db.upsert_user(user);
                Ok(())
            }
        }
    }

    // ─── Sessions ────────────────────────────────────────────────

    pub async fn get_session(&self, token: &str) -> Result<Option<Session>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.get_session(token).await,
            Backend::Memory(db) => Ok(db.get_session(token)),
        }
    }

    pub async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.insert_session(session).await,
            Backend::Memory(db) => {
                db.insert_session(session);
                Ok(())
            }
        }
    }

    /// Delete a session; deleting a missing session is not an error.
    pub async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.delete_session(token).await,
            Backend::Memory(db) => {
                db.delete_session(token);
                Ok(())
            }
        }
    }

    // ─── Treatments ──────────────────────────────────────────────

    pub async fn list_treatments(&self) -> Result<Vec<Treatment>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.list_treatments().await,
            Backend::Memory(db) => Ok(db.list_treatments()),
        }
    }

    pub async fn get_treatment(&self, treatment_id: &str) -> Result<Option<Treatment>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.get_treatment(treatment_id).await,
            Backend::Memory(db) => Ok(db.get_treatment(treatment_id)),
        }
    }

    // ─── Clinics ─────────────────────────────────────────────────

    /// Clinics matching the query, capped at [`limits::CLINICS`].
    pub async fn query_clinics(&self, query: &ClinicQuery) -> Result<Vec<Clinic>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.query_clinics(query).await,
            Backend::Memory(db) => Ok(db.query_clinics(query)),
        }
    }

    pub async fn get_clinic(&self, clinic_id: &str) -> Result<Option<Clinic>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.get_clinic(clinic_id).await,
            Backend::Memory(db) => Ok(db.get_clinic(clinic_id)),
        }
    }

    /// City of every clinic (with duplicates).
    pub async fn clinic_cities(&self) -> Result<Vec<String>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.clinic_cities().await,
            Backend::Memory(db) => Ok(db.clinic_cities()),
        }
    }

    // ─── Clinic-Treatment Links ──────────────────────────────────

    pub async fn links_for_treatment(
        &self,
        treatment_id: &str,
    ) -> Result<Vec<ClinicTreatment>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.links_for_treatment(treatment_id).await,
            Backend::Memory(db) => Ok(db.links_for_treatment(treatment_id)),
        }
    }

    pub async fn links_for_clinic(&self, clinic_id: &str) -> Result<Vec<ClinicTreatment>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.links_for_clinic(clinic_id).await,
            Backend::Memory(db) => Ok(db.links_for_clinic(clinic_id)),
        }
    }

    /// The offering linking `clinic_id` to `treatment_id`, if any.
    pub async fn find_link(
        &self,
        clinic_id: &str,
        treatment_id: &str,
    ) -> Result<Option<ClinicTreatment>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.find_link(clinic_id, treatment_id).await,
            Backend::Memory(db) => Ok(db.find_link(clinic_id, treatment_id)),
        }
    }

    // ─── Catalogue Replacement ───────────────────────────────────

    /// Delete every treatment, clinic and link, then store the given ones.
    pub async fn replace_catalog(
        &self,
        treatments: &[Treatment],
        clinics: &[Clinic],
        links: &[ClinicTreatment],
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.replace_catalog(treatments, clinics, links).await,
            Backend::Memory(db) => {
                db.replace_catalog(treatments, clinics, links);
                Ok(())
            }
        }
    }
}
