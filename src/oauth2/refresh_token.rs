// ABOUTME: Refresh token get-or-create, validation, and sliding-session renewal
// ABOUTME: At most one live token per (client, user) pair; rollover is transaction-backed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::{OauthError, OauthService};
use crate::crypto;
use crate::database::refresh_tokens;
use crate::errors::AppError;
use crate::models::{Client, RefreshToken};
use chrono::{Duration, Utc};
use uuid::Uuid;

impl OauthService {
    /// Return the live refresh token for a (client, user) pair, creating or
    /// replacing one as needed
    ///
    /// A live existing token is returned unchanged (idempotent read). An
    /// expired one is deleted and replaced with a fresh value. The whole
    /// sequence runs in one transaction so concurrent callers for the same
    /// pair never observe zero live rows.
    ///
    /// # Errors
    ///
    /// Returns an error if token value generation or the store fails
    pub async fn get_or_create_refresh_token(
        &self,
        client: &Client,
        user_id: Option<Uuid>,
        expires_in: i64,
        scope: &str,
    ) -> Result<RefreshToken, OauthError> {
        let now = Utc::now();
        let candidate = RefreshToken {
            id: Uuid::new_v4(),
            token: crypto::generate_token_value()?,
            expires_at: now + Duration::seconds(expires_in),
            scope: scope.to_owned(),
            client_id: client.id,
            user_id,
        };

        let mut tx = self.database().begin().await?;
        let refresh_token = refresh_tokens::get_or_create(&mut tx, candidate, now).await?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit refresh token: {e}")))?;

        Ok(refresh_token)
    }

    /// Fetch a valid refresh token for the given client
    ///
    /// # Errors
    ///
    /// - [`OauthError::RefreshTokenNotFound`] when no row matches
    /// - [`OauthError::RefreshTokenExpired`] when the row is past expiry
    pub async fn get_valid_refresh_token(
        &self,
        token: &str,
        client: &Client,
    ) -> Result<RefreshToken, OauthError> {
        let refresh_token = self
            .database()
            .get_refresh_token(token, client.id)
            .await?
            .ok_or(OauthError::RefreshTokenNotFound)?;

        if refresh_token.is_expired(Utc::now()) {
            return Err(OauthError::RefreshTokenExpired);
        }

        Ok(refresh_token)
    }

    /// Push out the expiry of the live refresh token for a (client, user)
    /// pair; a no-op returning `false` when none exists
    ///
    /// Never creates a row. The underlying update is a single statement and
    /// never moves the expiry backwards, so concurrent renewals settle on
    /// the latest timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn extend_refresh_token_if_present(
        &self,
        client_id: Uuid,
        user_id: Option<Uuid>,
        expires_in: i64,
    ) -> Result<bool, OauthError> {
        let now = Utc::now();
        let extended = self
            .database()
            .extend_refresh_token(client_id, user_id, now + Duration::seconds(expires_in), now)
            .await?;

        Ok(extended)
    }
}
