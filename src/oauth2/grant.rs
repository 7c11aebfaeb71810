// ABOUTME: Grant dispatcher: selects a grant-type handler and mints token pairs
// ABOUTME: Code exchange runs issuance and consumption as one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::models::{AccessTokenResponse, TokenRequest};
use super::{OauthError, OauthService};
use crate::crypto;
use crate::database::{access_tokens, authorization_codes, refresh_tokens};
use crate::errors::AppError;
use crate::models::{AccessToken, AuthorizationCode, Client, RefreshToken};
use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

impl OauthService {
    /// Token endpoint entry point: dispatch on the requested grant type
    ///
    /// The client has already been authenticated by the caller. Any
    /// validation failure short-circuits with no partial writes.
    ///
    /// # Errors
    ///
    /// Returns [`OauthError::UnsupportedGrantType`] for unknown grant types
    /// and whatever the selected handler returns otherwise
    pub async fn token(
        &self,
        request: &TokenRequest,
        client: &Client,
    ) -> Result<AccessTokenResponse, OauthError> {
        match request.grant_type.as_str() {
            "authorization_code" => self.authorization_code_grant(request, client).await,
            "refresh_token" => self.refresh_token_grant(request, client).await,
            "client_credentials" => self.client_credentials_grant(request, client).await,
            _ => Err(OauthError::UnsupportedGrantType),
        }
    }

    /// Exchange a single-use authorization code for a token pair
    async fn authorization_code_grant(
        &self,
        request: &TokenRequest,
        client: &Client,
    ) -> Result<AccessTokenResponse, OauthError> {
        let code = request
            .code
            .as_deref()
            .ok_or(OauthError::InvalidGrantRequest("Missing code parameter"))?;

        let authorization_code = self.get_valid_authorization_code(code, client).await?;
        self.check_redirect_uri(&authorization_code, request.redirect_uri.as_deref())?;

        let (access_token, refresh_token) =
            self.exchange_authorization_code(&authorization_code).await?;

        info!(
            client_id = %client.id,
            "authorization code exchanged for token pair"
        );

        Ok(AccessTokenResponse::new(
            &access_token,
            self.config().access_token_lifetime,
            Some(refresh_token.token),
        ))
    }

    /// Issue a fresh access token against a live refresh token
    ///
    /// The refresh token itself is not rotated: the live token for the
    /// (client, user) pair keeps its value, and its expiry moves only
    /// through the sliding renewal.
    async fn refresh_token_grant(
        &self,
        request: &TokenRequest,
        client: &Client,
    ) -> Result<AccessTokenResponse, OauthError> {
        let token = request.refresh_token.as_deref().ok_or(
            OauthError::InvalidGrantRequest("Missing refresh_token parameter"),
        )?;

        let refresh_token = self.get_valid_refresh_token(token, client).await?;

        let access_token = self
            .issue_access_token(
                client,
                refresh_token.user_id,
                self.config().access_token_lifetime,
                &refresh_token.scope,
            )
            .await?;

        Ok(AccessTokenResponse::new(
            &access_token,
            self.config().access_token_lifetime,
            Some(refresh_token.token),
        ))
    }

    /// Issue a client-only token pair directly from client credentials
    async fn client_credentials_grant(
        &self,
        request: &TokenRequest,
        client: &Client,
    ) -> Result<AccessTokenResponse, OauthError> {
        let scope = self.get_scope(request.scope.as_deref()).await?;

        let access_token = self
            .issue_access_token(client, None, self.config().access_token_lifetime, &scope)
            .await?;
        let refresh_token = self
            .get_or_create_refresh_token(
                client,
                None,
                self.config().refresh_token_lifetime,
                &scope,
            )
            .await?;

        Ok(AccessTokenResponse::new(
            &access_token,
            self.config().access_token_lifetime,
            Some(refresh_token.token),
        ))
    }

    /// Enforce the redirect-URI policy for a code exchange
    ///
    /// A code that carries a redirect URI requires an exact match. A code
    /// without one fails too while `require_redirect_uri` is set.
    fn check_redirect_uri(
        &self,
        authorization_code: &AuthorizationCode,
        presented: Option<&str>,
    ) -> Result<(), OauthError> {
        match &authorization_code.redirect_uri {
            Some(stored) => {
                if presented != Some(stored.as_str()) {
                    return Err(OauthError::InvalidRedirectUri);
                }
            }
            None => {
                if self.config().require_redirect_uri {
                    return Err(OauthError::InvalidRedirectUri);
                }
            }
        }

        Ok(())
    }

    /// Mint the token pair and consume the code as one atomic unit
    ///
    /// The conditional delete is the exactly-once arbiter: under concurrent
    /// exchanges of the same code, the transaction that fails to delete the
    /// row rolls its token inserts back and reports the code as gone.
    async fn exchange_authorization_code(
        &self,
        authorization_code: &AuthorizationCode,
    ) -> Result<(AccessToken, RefreshToken), OauthError> {
        let now = Utc::now();

        let access_token = AccessToken {
            id: Uuid::new_v4(),
            token: crypto::generate_token_value()?,
            expires_at: now + Duration::seconds(self.config().access_token_lifetime),
            scope: authorization_code.scope.clone(),
            client_id: authorization_code.client_id,
            user_id: authorization_code.user_id,
        };
        let candidate = RefreshToken {
            id: Uuid::new_v4(),
            token: crypto::generate_token_value()?,
            expires_at: now + Duration::seconds(self.config().refresh_token_lifetime),
            scope: authorization_code.scope.clone(),
            client_id: authorization_code.client_id,
            user_id: authorization_code.user_id,
        };

        let mut tx = self.database().begin().await?;

        access_tokens::insert(&mut tx, &access_token).await?;
        let refresh_token = refresh_tokens::get_or_create(&mut tx, candidate, now).await?;

        let consumed = authorization_codes::delete(
            &mut tx,
            &authorization_code.code,
            authorization_code.client_id,
        )
        .await?;
        if !consumed {
            tx.rollback()
                .await
                .map_err(|e| AppError::database(format!("Failed to roll back exchange: {e}")))?;
            return Err(OauthError::AuthorizationCodeNotFound);
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit exchange: {e}")))?;

        Ok((access_token, refresh_token))
    }
}
