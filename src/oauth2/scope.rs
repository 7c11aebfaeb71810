// ABOUTME: Scope resolution for grant requests
// ABOUTME: Opaque labels checked against the scopes table; no grammar beyond spaces
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::{OauthError, OauthService};

impl OauthService {
    /// Resolve the scope for a grant
    ///
    /// A missing or empty request falls back to the default scopes; a
    /// present one is echoed back after every space-separated token is
    /// confirmed to exist.
    ///
    /// # Errors
    ///
    /// Returns [`OauthError::InvalidScope`] when a requested token is unknown
    pub async fn get_scope(&self, requested: Option<&str>) -> Result<String, OauthError> {
        match requested {
            Some(requested) if !requested.is_empty() => {
                if self.database().scope_exists(requested).await? {
                    Ok(requested.to_owned())
                } else {
                    Err(OauthError::InvalidScope)
                }
            }
            _ => Ok(self.database().get_default_scope().await?),
        }
    }
}
