// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod compare;
pub mod identity;
pub mod password;
pub mod seed;
pub mod session;
pub mod token;

pub use catalog::{CatalogService, SearchFilters};
pub use compare::CompareService;
pub use identity::{IdentityClient, IdentityService};
pub use seed::CatalogSeed;
pub use session::{AuthError, SessionResolver};
pub use token::{TokenError, TokenIssuer};
