// ABOUTME: OAuth2 configuration: credential lifetimes and grant policy
// ABOUTME: Injected as an immutable snapshot into the domain service at construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use crate::config::environment::parse_env_var;
use crate::errors::AppResult;

/// Default access token lifetime in seconds (1 hour)
const DEFAULT_ACCESS_TOKEN_LIFETIME: i64 = 3600;
/// Default refresh token lifetime in seconds (14 days)
const DEFAULT_REFRESH_TOKEN_LIFETIME: i64 = 1_209_600;
/// Default authorization code lifetime in seconds (1 hour)
const DEFAULT_AUTH_CODE_LIFETIME: i64 = 3600;

/// OAuth2 lifetimes and grant policy
#[derive(Debug, Clone)]
pub struct OauthConfig {
    /// Seconds an access token stays valid after issuance
    pub access_token_lifetime: i64,
    /// Seconds a refresh token stays valid after issuance or renewal
    pub refresh_token_lifetime: i64,
    /// Seconds an authorization code stays exchangeable after grant
    pub auth_code_lifetime: i64,
    /// Whether the authorization code exchange requires a matching redirect URI
    /// even when the stored code carries none
    pub require_redirect_uri: bool,
}

impl Default for OauthConfig {
    fn default() -> Self {
        Self {
            access_token_lifetime: DEFAULT_ACCESS_TOKEN_LIFETIME,
            refresh_token_lifetime: DEFAULT_REFRESH_TOKEN_LIFETIME,
            auth_code_lifetime: DEFAULT_AUTH_CODE_LIFETIME,
            require_redirect_uri: true,
        }
    }
}

impl OauthConfig {
    /// Load OAuth2 settings from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            access_token_lifetime: parse_env_var(
                "OAUTH_ACCESS_TOKEN_LIFETIME",
                DEFAULT_ACCESS_TOKEN_LIFETIME,
            )?,
            refresh_token_lifetime: parse_env_var(
                "OAUTH_REFRESH_TOKEN_LIFETIME",
                DEFAULT_REFRESH_TOKEN_LIFETIME,
            )?,
            auth_code_lifetime: parse_env_var(
                "OAUTH_AUTH_CODE_LIFETIME",
                DEFAULT_AUTH_CODE_LIFETIME,
            )?,
            require_redirect_uri: parse_env_var("OAUTH_REQUIRE_REDIRECT_URI", true)?,
        })
    }
}
