// ABOUTME: Client authentication for the token endpoint
// ABOUTME: Key lookup plus constant-time secret comparison; failures are indistinct
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::{OauthError, OauthService};
use crate::crypto;
use crate::models::Client;
use tracing::warn;

impl OauthService {
    /// Authenticate a client by key and secret
    ///
    /// An unknown key and a wrong secret both map to
    /// [`OauthError::InvalidClient`] so the response does not reveal which
    /// check failed.
    ///
    /// # Errors
    ///
    /// Returns [`OauthError::InvalidClient`] on any credential mismatch
    pub async fn authenticate_client(&self, key: &str, secret: &str) -> Result<Client, OauthError> {
        let client = self
            .database()
            .get_client_by_key(key)
            .await?
            .ok_or(OauthError::InvalidClient)?;

        if !crypto::secrets_match(&client.secret, secret) {
            warn!(client_key = %key, "client secret mismatch");
            return Err(OauthError::InvalidClient);
        }

        Ok(client)
    }
}
