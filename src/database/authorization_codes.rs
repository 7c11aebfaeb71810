// ABOUTME: Authorization code persistence: single-use rows keyed by code value
// ABOUTME: Consumption is a conditional delete so concurrent exchanges settle to one winner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::{parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::AuthorizationCode;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Persist a freshly granted authorization code
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_authorization_code(
        &self,
        authorization_code: &AuthorizationCode,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO oauth_authorization_codes
                (id, code, redirect_uri, expires_at, scope, client_id, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(authorization_code.id.to_string())
        .bind(&authorization_code.code)
        .bind(&authorization_code.redirect_uri)
        .bind(authorization_code.expires_at)
        .bind(&authorization_code.scope)
        .bind(authorization_code.client_id.to_string())
        .bind(authorization_code.user_id.map(|id| id.to_string()))
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create authorization code: {e}")))?;

        Ok(())
    }

    /// Look up an authorization code scoped to its owning client
    ///
    /// Returns the row whether or not it has expired; the caller classifies
    /// expiry so "expired" and "not found" stay distinguishable.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_authorization_code(
        &self,
        code: &str,
        client_id: Uuid,
    ) -> AppResult<Option<AuthorizationCode>> {
        let row = sqlx::query(
            r"
            SELECT id, code, redirect_uri, expires_at, scope, client_id, user_id
            FROM oauth_authorization_codes
            WHERE code = ? AND client_id = ?
            ",
        )
        .bind(code)
        .bind(client_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to query authorization code: {e}")))?;

        row.as_ref().map(row_to_authorization_code).transpose()
    }
}

/// Conditionally delete a code row; the returned flag tells the caller
/// whether this transaction is the one that consumed it.
pub(crate) async fn delete(
    conn: &mut SqliteConnection,
    code: &str,
    client_id: Uuid,
) -> AppResult<bool> {
    let result =
        sqlx::query("DELETE FROM oauth_authorization_codes WHERE code = ? AND client_id = ?")
            .bind(code)
            .bind(client_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete authorization code: {e}")))?;

    Ok(result.rows_affected() > 0)
}

/// Convert a database row to an `AuthorizationCode`
fn row_to_authorization_code(row: &SqliteRow) -> AppResult<AuthorizationCode> {
    let id: String = row.get("id");
    let client_id: String = row.get("client_id");
    let user_id: Option<String> = row.get("user_id");

    Ok(AuthorizationCode {
        id: parse_uuid(&id, "id")?,
        code: row.get("code"),
        redirect_uri: row.get("redirect_uri"),
        expires_at: row.get("expires_at"),
        scope: row.get("scope"),
        client_id: parse_uuid(&client_id, "client_id")?,
        user_id: user_id
            .as_deref()
            .map(|value| parse_uuid(value, "user_id"))
            .transpose()?,
    })
}
