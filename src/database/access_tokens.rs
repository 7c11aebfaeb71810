// ABOUTME: Access token persistence: bearer credentials looked up by token value alone
// ABOUTME: Insertion is connection-level so code exchange can batch it into a transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::{parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::AccessToken;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

impl Database {
    /// Persist a new access token
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_access_token(&self, access_token: &AccessToken) -> AppResult<()> {
        let mut conn = self
            .pool()
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        insert(&mut conn, access_token).await
    }

    /// Look up an access token by its value; the bearer string is the sole key
    ///
    /// Returns the row whether or not it has expired; the caller classifies
    /// expiry so "expired" and "not found" stay distinguishable.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_access_token(&self, token: &str) -> AppResult<Option<AccessToken>> {
        let row = sqlx::query(
            r"
            SELECT id, token, expires_at, scope, client_id, user_id
            FROM oauth_access_tokens WHERE token = ?
            ",
        )
        .bind(token)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to query access token: {e}")))?;

        row.as_ref().map(row_to_access_token).transpose()
    }
}

/// Insert an access token on the given connection
pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    access_token: &AccessToken,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO oauth_access_tokens (id, token, expires_at, scope, client_id, user_id)
        VALUES (?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(access_token.id.to_string())
    .bind(&access_token.token)
    .bind(access_token.expires_at)
    .bind(&access_token.scope)
    .bind(access_token.client_id.to_string())
    .bind(access_token.user_id.map(|id| id.to_string()))
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to create access token: {e}")))?;

    Ok(())
}

/// Convert a database row to an `AccessToken`
fn row_to_access_token(row: &SqliteRow) -> AppResult<AccessToken> {
    let id: String = row.get("id");
    let client_id: String = row.get("client_id");
    let user_id: Option<String> = row.get("user_id");

    Ok(AccessToken {
        id: parse_uuid(&id, "id")?,
        token: row.get("token"),
        expires_at: row.get("expires_at"),
        scope: row.get("scope"),
        client_id: parse_uuid(&client_id, "client_id")?,
        user_id: user_id
            .as_deref()
            .map(|value| parse_uuid(value, "user_id"))
            .transpose()?,
    })
}
