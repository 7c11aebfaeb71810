// ABOUTME: OAuth2 entity models: clients, users, scopes, codes, and tokens
// ABOUTME: Identifiers are opaque UUIDs; an absent user_id marks a client-only credential
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered client application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Surrogate key
    pub id: Uuid,
    /// Public client identifier presented on token requests
    pub key: String,
    /// Client secret, verified in constant time
    pub secret: String,
    /// Registered redirect URI, if any
    pub redirect_uri: Option<String>,
}

/// An end user able to participate in grants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Surrogate key
    pub id: Uuid,
    /// Unique username
    pub username: String,
    /// Optional password credential (hashing is handled by the registration flow)
    pub password: Option<String>,
}

/// An opaque capability label clients may request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    /// Surrogate key
    pub id: Uuid,
    /// The scope string itself
    pub scope: String,
    /// Human-readable description
    pub description: Option<String>,
    /// Whether this scope is granted when a request names none
    pub is_default: bool,
}

/// A single-use authorization code awaiting exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationCode {
    /// Surrogate key
    pub id: Uuid,
    /// The unique code value
    pub code: String,
    /// Redirect URI the exchange must repeat, if one was bound at grant time
    pub redirect_uri: Option<String>,
    /// When this code stops being exchangeable
    pub expires_at: DateTime<Utc>,
    /// Space-separated scope granted to the eventual token pair
    pub scope: String,
    /// Owning client
    pub client_id: Uuid,
    /// Authorizing user, absent for client-only grants
    pub user_id: Option<Uuid>,
}

/// A refresh token; at most one live row exists per (client, user) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Surrogate key
    pub id: Uuid,
    /// The unique token value
    pub token: String,
    /// When this token expires (extended by the sliding-session renewal)
    pub expires_at: DateTime<Utc>,
    /// Space-separated scope
    pub scope: String,
    /// Owning client
    pub client_id: Uuid,
    /// Associated user, absent for client-only tokens
    pub user_id: Option<Uuid>,
}

/// A bearer access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Surrogate key
    pub id: Uuid,
    /// The unique token value; possession alone grants access
    pub token: String,
    /// When this token expires
    pub expires_at: DateTime<Utc>,
    /// Space-separated scope
    pub scope: String,
    /// Owning client
    pub client_id: Uuid,
    /// Associated user, absent for client-only tokens
    pub user_id: Option<Uuid>,
}

impl AuthorizationCode {
    /// Whether the code is past its expiry at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

impl RefreshToken {
    /// Whether the token is past its expiry at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

impl AccessToken {
    /// Whether the token is past its expiry at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether this token is bound to a client only, with no end user
    #[must_use]
    pub fn is_client_only(&self) -> bool {
        self.user_id.is_none()
    }
}
