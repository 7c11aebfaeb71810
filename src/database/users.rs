// ABOUTME: User persistence: lookup by username for grant participation
// ABOUTME: Password hashing and registration flows live outside this service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::{parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::User;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl Database {
    /// Persist a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including username collisions
    pub async fn create_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO oauth_users (id, username, password)
            VALUES (?, ?, ?)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.password)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        Ok(())
    }

    /// Look up a user by username
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, username, password
            FROM oauth_users WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to query user: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

/// Convert a database row to a `User`
fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let id: String = row.get("id");

    Ok(User {
        id: parse_uuid(&id, "id")?,
        username: row.get("username"),
        password: row.get("password"),
    })
}
