// ABOUTME: Refresh token persistence: one live row per (client, user) pair
// ABOUTME: Rollover runs on a caller-held transaction; renewal is a single monotonic UPDATE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::{parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::RefreshToken;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Persist a new refresh token
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_refresh_token(&self, refresh_token: &RefreshToken) -> AppResult<()> {
        let mut conn = self
            .pool()
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        insert(&mut conn, refresh_token).await
    }

    /// Look up a refresh token by value, scoped to its owning client
    ///
    /// Returns the row whether or not it has expired; the caller classifies
    /// expiry so "expired" and "not found" stay distinguishable.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_refresh_token(
        &self,
        token: &str,
        client_id: Uuid,
    ) -> AppResult<Option<RefreshToken>> {
        let row = sqlx::query(
            r"
            SELECT id, token, expires_at, scope, client_id, user_id
            FROM oauth_refresh_tokens
            WHERE token = ? AND client_id = ?
            ",
        )
        .bind(token)
        .bind(client_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to query refresh token: {e}")))?;

        row.as_ref().map(row_to_refresh_token).transpose()
    }

    /// Extend the live refresh token for a (client, user) pair in one statement
    ///
    /// The update only touches rows that are still live at `now` and never
    /// moves `expires_at` backwards, so concurrent renewals settle on the
    /// latest timestamp. Returns whether a row was extended.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn extend_refresh_token(
        &self,
        client_id: Uuid,
        user_id: Option<Uuid>,
        new_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE oauth_refresh_tokens
            SET expires_at = ?
            WHERE client_id = ? AND user_id IS ?
              AND expires_at > ? AND expires_at < ?
            ",
        )
        .bind(new_expires_at)
        .bind(client_id.to_string())
        .bind(user_id.map(|id| id.to_string()))
        .bind(now)
        .bind(new_expires_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to extend refresh token: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Insert a refresh token on the given connection
pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    refresh_token: &RefreshToken,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO oauth_refresh_tokens (id, token, expires_at, scope, client_id, user_id)
        VALUES (?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(refresh_token.id.to_string())
    .bind(&refresh_token.token)
    .bind(refresh_token.expires_at)
    .bind(&refresh_token.scope)
    .bind(refresh_token.client_id.to_string())
    .bind(refresh_token.user_id.map(|id| id.to_string()))
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to create refresh token: {e}")))?;

    Ok(())
}

/// Find the refresh token row for a (client, user) pair, expired or not
pub(crate) async fn find_by_pair(
    conn: &mut SqliteConnection,
    client_id: Uuid,
    user_id: Option<Uuid>,
) -> AppResult<Option<RefreshToken>> {
    let row = sqlx::query(
        r"
        SELECT id, token, expires_at, scope, client_id, user_id
        FROM oauth_refresh_tokens
        WHERE client_id = ? AND user_id IS ?
        ",
    )
    .bind(client_id.to_string())
    .bind(user_id.map(|id| id.to_string()))
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to query refresh token: {e}")))?;

    row.as_ref().map(row_to_refresh_token).transpose()
}

/// Delete a refresh token row by surrogate key
pub(crate) async fn delete_by_id(conn: &mut SqliteConnection, id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM oauth_refresh_tokens WHERE id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete refresh token: {e}")))?;

    Ok(())
}

/// Return the live refresh token for the candidate's (client, user) pair,
/// replacing an expired row or inserting the candidate when none exists.
///
/// Runs on a caller-held transaction so the select/delete/insert sequence
/// commits or rolls back as one unit.
pub(crate) async fn get_or_create(
    conn: &mut SqliteConnection,
    candidate: RefreshToken,
    now: DateTime<Utc>,
) -> AppResult<RefreshToken> {
    if let Some(existing) = find_by_pair(&mut *conn, candidate.client_id, candidate.user_id).await?
    {
        if !existing.is_expired(now) {
            return Ok(existing);
        }
        delete_by_id(&mut *conn, existing.id).await?;
    }

    insert(&mut *conn, &candidate).await?;
    Ok(candidate)
}

/// Convert a database row to a `RefreshToken`
fn row_to_refresh_token(row: &SqliteRow) -> AppResult<RefreshToken> {
    let id: String = row.get("id");
    let client_id: String = row.get("client_id");
    let user_id: Option<String> = row.get("user_id");

    Ok(RefreshToken {
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
