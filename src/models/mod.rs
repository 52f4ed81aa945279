// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod clinic;
pub mod comparison;
pub mod treatment;
pub mod user;

pub use clinic::{Clinic, ClinicDetail, ClinicView};
pub use comparison::{ComparisonEntry, ComparisonResult};
pub use treatment::{ClinicTreatment, Treatment, TreatmentOffering};
pub use user::{Session, User};
