// ABOUTME: Authorization code granting and validation
// ABOUTME: Codes are single-use; consumption happens in the grant dispatcher's transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::{OauthError, OauthService};
use crate::crypto;
use crate::models::{AuthorizationCode, Client, User};
use chrono::{Duration, Utc};
use uuid::Uuid;

impl OauthService {
    /// Grant a new single-use authorization code
    ///
    /// An empty `redirect_uri` means none is bound to the code. The insert
    /// is the only side effect.
    ///
    /// # Errors
    ///
    /// Returns an error if token value generation or the insert fails
    pub async fn grant_authorization_code(
        &self,
        client: &Client,
        user: Option<&User>,
        expires_in: i64,
        redirect_uri: &str,
        scope: &str,
    ) -> Result<AuthorizationCode, OauthError> {
        let authorization_code = AuthorizationCode {
            id: Uuid::new_v4(),
            code: crypto::generate_token_value()?,
            redirect_uri: (!redirect_uri.is_empty()).then(|| redirect_uri.to_owned()),
            expires_at: Utc::now() + Duration::seconds(expires_in),
            scope: scope.to_owned(),
            client_id: client.id,
            user_id: user.map(|u| u.id),
        };

        self.database()
            .create_authorization_code(&authorization_code)
            .await?;

        Ok(authorization_code)
    }

    /// Fetch a valid authorization code for the given client
    ///
    /// # Errors
    ///
    /// - [`OauthError::AuthorizationCodeNotFound`] when no row matches the
    ///   (code, client) pair, including a code owned by another client
    /// - [`OauthError::AuthorizationCodeExpired`] when the row exists but is
    ///   past expiry; callers must be able to tell the two apart
    pub async fn get_valid_authorization_code(
        &self,
        code: &str,
        client: &Client,
    ) -> Result<AuthorizationCode, OauthError> {
        let authorization_code = self
            .database()
            .get_authorization_code(code, client.id)
            .await?
            .ok_or(OauthError::AuthorizationCodeNotFound)?;

        if authorization_code.is_expired(Utc::now()) {
            return Err(OauthError::AuthorizationCodeExpired);
        }

        Ok(authorization_code)
    }
}
