// ABOUTME: Access token issuance and bearer-token authentication
// ABOUTME: Each successful authentication slides the matching refresh token forward
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::{OauthError, OauthService};
use crate::crypto;
use crate::models::{AccessToken, Client};
use chrono::{Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

impl OauthService {
    /// Issue a new access token for a client and optional user
    ///
    /// # Errors
    ///
    /// Returns an error if token value generation or the insert fails
    pub async fn issue_access_token(
        &self,
        client: &Client,
        user_id: Option<Uuid>,
        expires_in: i64,
        scope: &str,
    ) -> Result<AccessToken, OauthError> {
        let access_token = AccessToken {
            id: Uuid::new_v4(),
            token: crypto::generate_token_value()?,
            expires_at: Utc::now() + Duration::seconds(expires_in),
            scope: scope.to_owned(),
            client_id: client.id,
            user_id,
        };

        self.database().create_access_token(&access_token).await?;

        Ok(access_token)
    }

    /// Validate a bearer token; the token value is the sole credential
    ///
    /// On success the refresh token belonging to this token's (client, user)
    /// pair is extended by the configured refresh-token lifetime, whichever
    /// token that currently is. The renewal is best-effort: a missing
    /// refresh token or a failed extension never fails the authentication.
    ///
    /// # Errors
    ///
    /// - [`OauthError::AccessTokenNotFound`] when no row matches the value
    /// - [`OauthError::AccessTokenExpired`] when the row is past expiry
    pub async fn authenticate(&self, token: &str) -> Result<AccessToken, OauthError> {
        let access_token = self
            .database()
            .get_access_token(token)
            .await?
            .ok_or(OauthError::AccessTokenNotFound)?;

        if access_token.is_expired(Utc::now()) {
            return Err(OauthError::AccessTokenExpired);
        }

        // Sliding session: every successful authentication pushes out the
        // expiry of whichever refresh token belongs to this pair.
        match self
            .extend_refresh_token_if_present(
                access_token.client_id,
                access_token.user_id,
                self.config().refresh_token_lifetime,
            )
            .await
        {
            Ok(true) => debug!(
                client_id = %access_token.client_id,
                "refresh token extended by sliding renewal"
            ),
            Ok(false) => {}
            Err(e) => warn!("refresh token renewal failed during authentication: {e}"),
        }

        Ok(access_token)
    }
}
