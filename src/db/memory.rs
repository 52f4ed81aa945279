// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store used for local development and tests.
//!
//! Each collection is a map keyed by document ID. Reads return clones sorted
//! by document ID, matching Firestore's default ordering.

use super::{limits, ClinicQuery};
use crate::models::{Clinic, ClinicTreatment, Session, Treatment, User};
use dashmap::DashMap;

/// Map-backed store with per-document atomicity.
#[derive(Default)]
pub struct MemoryDb {
    users: DashMap<String, User>,
    sessions: DashMap<String, Session>,
    treatments: DashMap<String, Treatment>,
    clinics: DashMap<String, Clinic>,
    clinic_treatments: DashMap<String, ClinicTreatment>,
}

/// Clone every value whose document passes `keep`, in document ID order.
fn sorted_values<T, F>(map: &DashMap<String, T>, keep: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let mut entries: Vec<(String, T)> = map
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().map(|(_, value)| value).collect()
}

impl MemoryDb {
    // ─── Users ───────────────────────────────────────────────────

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|u| u.value().clone())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        sorted_values(&self.users, |u| u.email == email)
            .into_iter()
            .next()
    }

    pub fn upsert_user(&self, user: &User) {
        self.users.insert(user.user_id.clone(), user.clone());
    }

    // ─── Sessions ────────────────────────────────────────────────

    pub fn get_session(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|s| s.value().clone())
    }

    pub fn insert_session(&self, session: &Session) {
        self.sessions
            .insert(session.session_token.clone(), session.clone());
    }

    pub fn delete_session(&self, token: &str) {
        self.sessions.remove(token);
    }

    // ─── Catalogue ───────────────────────────────────────────────

    pub fn list_treatments(&self) -> Vec<Treatment> {
        let mut treatments = sorted_values(&self.treatments, |_| true);
        treatments.truncate(limits::TREATMENTS);
        treatments
    }

    pub fn get_treatment(&self, treatment_id: &str) -> Option<Treatment> {
        self.treatments.get(treatment_id).map(|t| t.value().clone())
    }

    pub fn query_clinics(&self, query: &ClinicQuery) -> Vec<Clinic> {
        let mut clinics = sorted_values(&self.clinics, |c| query.matches(c));
        clinics.truncate(limits::CLINICS);
        clinics
    }

    pub fn get_clinic(&self, clinic_id: &str) -> Option<Clinic> {
        self.clinics.get(clinic_id).map(|c| c.value().clone())
    }

    pub fn clinic_cities(&self) -> Vec<String> {
        sorted_values(&self.clinics, |_| true)
            .into_iter()
            .take(limits::CITY_SCAN)
            .map(|c| c.city)
            .collect()
    }

    pub fn links_for_treatment(&self, treatment_id: &str) -> Vec<ClinicTreatment> {
        let mut links = sorted_values(&self.clinic_treatments, |l| l.treatment_id == treatment_id);
        links.truncate(limits::LINKS_PER_TREATMENT);
        links
    }

    pub fn links_for_clinic(&self, clinic_id: &str) -> Vec<ClinicTreatment> {
        let mut links = sorted_values(&self.clinic_treatments, |l| l.clinic_id == clinic_id);
        links.truncate(limits::LINKS_PER_CLINIC);
        links
    }

    pub fn find_link(&self, clinic_id: &str, treatment_id: &str) -> Option<ClinicTreatment> {
        sorted_values(&self.clinic_treatments, |l| {
            l.clinic_id == clinic_id && l.treatment_id == treatment_id
        })
        .into_iter()
        .next()
    }

    pub fn replace_catalog(
        &self,
        treatments: &[Treatment],
        clinics: &[Clinic],
        links: &[ClinicTreatment],
    ) {
        self.treatments.clear();
        self.clinics.clear();
        self.clinic_treatments.clear();

        for treatment in treatments {
            self.treatments
                .insert(treatment.treatment_id.clone(), treatment.clone());
        }
        for clinic in clinics {
            self.clinics.insert(clinic.clinic_id.clone(), clinic.clone());
        }
        for link in links {
            self.clinic_treatments.insert(link.id.clone(), link.clone());
        }
    }
}
