// ABOUTME: Bearer-token authentication helper for request middleware
// ABOUTME: Callers map any returned error to a 401 response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use crate::models::AccessToken;
use crate::oauth2::{OauthError, OauthService};
use axum::http::{header, HeaderMap};

/// Authenticate a request from its `Authorization: Bearer` header
///
/// A missing or malformed header authenticates the empty string, which
/// resolves to [`OauthError::AccessTokenNotFound`].
///
/// # Errors
///
/// Returns the typed authentication error; callers map any error to 401
pub async fn authenticate_request(
    service: &OauthService,
    headers: &HeaderMap,
) -> Result<AccessToken, OauthError> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default();

    service.authenticate(bearer).await
}
