// ABOUTME: Typed error taxonomy for the OAuth2 flows with HTTP status mapping
// ABOUTME: Display strings double as the stable wire `error` field
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use crate::errors::AppError;
use http::StatusCode;
use thiserror::Error;

/// Domain errors returned by the OAuth2 service
///
/// Every variant is a typed value the HTTP layer can map to a precise
/// status code; store failures are wrapped rather than flattened so they
/// surface as internal errors instead of authentication failures.
#[derive(Debug, Error)]
pub enum OauthError {
    /// No authorization code row matches the (code, client) pair
    #[error("Authorization code not found")]
    AuthorizationCodeNotFound,
    /// The code row exists but is past its expiry
    #[error("Authorization code expired")]
    AuthorizationCodeExpired,
    /// The exchange redirect URI does not match the one bound at grant time
    #[error("Invalid redirect URI")]
    InvalidRedirectUri,
    /// No refresh token row matches the (token, client) pair
    #[error("Refresh token not found")]
    RefreshTokenNotFound,
    /// The refresh token row exists but is past its expiry
    #[error("Refresh token expired")]
    RefreshTokenExpired,
    /// No access token row matches the bearer value
    #[error("Access token not found")]
    AccessTokenNotFound,
    /// The access token row exists but is past its expiry
    #[error("Access token expired")]
    AccessTokenExpired,
    /// Client key unknown or secret mismatch
    #[error("Invalid client ID or secret")]
    InvalidClient,
    /// Requested scope contains tokens this service does not know
    #[error("Invalid scope")]
    InvalidScope,
    /// The request named a grant type this service does not implement
    #[error("Invalid grant type")]
    UnsupportedGrantType,
    /// The request is missing a parameter its grant type requires
    #[error("{0}")]
    InvalidGrantRequest(&'static str),
    /// Underlying persistence failure; never retried inside the core
    #[error(transparent)]
    Store(#[from] AppError),
}

impl OauthError {
    /// HTTP status the collaborator layer should respond with
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRedirectUri
            | Self::InvalidScope
            | Self::UnsupportedGrantType
            | Self::InvalidGrantRequest(_) => StatusCode::BAD_REQUEST,
            Self::AuthorizationCodeNotFound
            | Self::AuthorizationCodeExpired
            | Self::RefreshTokenNotFound
            | Self::RefreshTokenExpired
            | Self::AccessTokenNotFound
            | Self::AccessTokenExpired
            | Self::InvalidClient => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable string for the wire `error` field
    ///
    /// Store failures are masked; their detail belongs in the server log,
    /// not in the response body.
    #[must_use]
    pub fn wire_message(&self) -> String {
        match self {
            Self::Store(_) => "Internal server error".to_owned(),
            other => other.to_string(),
        }
    }
}
