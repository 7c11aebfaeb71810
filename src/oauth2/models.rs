// ABOUTME: OAuth2 token endpoint request and response types
// ABOUTME: Wire shapes only; domain entities live in crate::models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use crate::models::AccessToken;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// OAuth2 token endpoint request
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    /// Grant type (`authorization_code`, `refresh_token`, `client_credentials`)
    pub grant_type: String,
    /// Authorization code (for the `authorization_code` grant)
    pub code: Option<String>,
    /// Redirect URI repeated from the authorization request
    pub redirect_uri: Option<String>,
    /// Refresh token (for the `refresh_token` grant)
    pub refresh_token: Option<String>,
    /// Requested scope (for the `client_credentials` grant)
    pub scope: Option<String>,
    /// Client key, when not sent via HTTP Basic auth
    pub client_id: Option<String>,
    /// Client secret, when not sent via HTTP Basic auth
    pub client_secret: Option<String>,
}

/// OAuth2 token endpoint success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    /// Surrogate key of the issued access token
    pub id: Uuid,
    /// The access token value
    pub access_token: String,
    /// Seconds until the access token expires, from the configured lifetime
    pub expires_in: i64,
    /// Always `"Bearer"`
    pub token_type: String,
    /// Scope granted to the token pair
    pub scope: String,
    /// Refresh token paired with the access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl AccessTokenResponse {
    /// Build the response payload for a freshly issued access token
    #[must_use]
    pub fn new(access_token: &AccessToken, expires_in: i64, refresh_token: Option<String>) -> Self {
        Self {
            id: access_token.id,
            access_token: access_token.token.clone(),
            expires_in,
            token_type: "Bearer".to_owned(),
            scope: access_token.scope.clone(),
            refresh_token,
        }
    }
}
