// ABOUTME: Scope persistence: known scope strings and default-scope resolution
// ABOUTME: Scope values are opaque labels; no grammar beyond space separation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Scope;
use sqlx::Row;

impl Database {
    /// Persist a new scope definition
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_scope(&self, scope: &Scope) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO oauth_scopes (id, scope, description, is_default)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(scope.id.to_string())
        .bind(&scope.scope)
        .bind(&scope.description)
        .bind(scope.is_default)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create scope: {e}")))?;

        Ok(())
    }

    /// Check that every space-separated token of `scope` is a known scope
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn scope_exists(&self, scope: &str) -> AppResult<bool> {
        let tokens: Vec<&str> = scope.split(' ').filter(|s| !s.is_empty()).collect();
        if tokens.is_empty() {
            return Ok(false);
        }

        let placeholders = vec!["?"; tokens.len()].join(", ");
        let query = format!("SELECT COUNT(*) AS known FROM oauth_scopes WHERE scope IN ({placeholders})");

        let mut count_query = sqlx::query(&query);
        for token in &tokens {
            count_query = count_query.bind(*token);
        }

        let row = count_query
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to query scopes: {e}")))?;

        let known: i64 = row.get("known");
        Ok(known as usize == tokens.len())
    }

    /// Get the space-joined default scope string
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_default_scope(&self) -> AppResult<String> {
        let rows = sqlx::query("SELECT scope FROM oauth_scopes WHERE is_default = TRUE ORDER BY scope")
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to query default scopes: {e}")))?;

        let scopes: Vec<String> = rows.iter().map(|row| row.get("scope")).collect();
        Ok(scopes.join(" "))
    }
}
