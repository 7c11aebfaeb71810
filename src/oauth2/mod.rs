// ABOUTME: OAuth2 domain service: grants, token issuance, and bearer authentication
// ABOUTME: One service struct; method groups per concern live in the submodules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

//! # OAuth2 Domain Service
//!
//! [`OauthService`] implements the protocol core: the authorization-code
//! grant state machine, refresh-token rolling renewal, access token
//! issuance, and bearer-token authentication. All persistence detail stays
//! behind [`crate::database::Database`]; the service only sees domain
//! values and typed errors.

mod access_token;
mod authorization_code;
mod client;
/// Typed error taxonomy for the OAuth2 flows
pub mod error;
mod grant;
/// Token endpoint request/response types
pub mod models;
mod refresh_token;
mod scope;

pub use error::OauthError;
pub use models::{AccessTokenResponse, TokenRequest};

use crate::config::oauth::OauthConfig;
use crate::database::Database;
use std::sync::Arc;

/// The OAuth2 domain service
///
/// Holds the store handle and an immutable configuration snapshot;
/// configuration reloads swap the snapshot reference rather than mutating
/// shared state, so in-flight operations always see a consistent view.
pub struct OauthService {
    db: Database,
    config: Arc<OauthConfig>,
}

impl OauthService {
    /// Create a new service over the given store and configuration snapshot
    #[must_use]
    pub fn new(db: Database, config: Arc<OauthConfig>) -> Self {
        Self { db, config }
    }

    /// Access the underlying store (used by the health endpoint)
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Access the configuration snapshot
    #[must_use]
    pub fn config(&self) -> &OauthConfig {
        &self.config
    }
}
