// ABOUTME: Client persistence: registration rows looked up by public client key
// ABOUTME: Secrets are stored verbatim and verified in constant time by the service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use super::{parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::Client;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl Database {
    /// Persist a new client registration
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including key collisions
    pub async fn create_client(&self, client: &Client) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO oauth_clients (id, client_key, client_secret, redirect_uri)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(client.id.to_string())
        .bind(&client.key)
        .bind(&client.secret)
        .bind(&client.redirect_uri)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create client: {e}")))?;

        Ok(())
    }

    /// Look up a client by its public key
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_client_by_key(&self, key: &str) -> AppResult<Option<Client>> {
        let row = sqlx::query(
            r"
            SELECT id, client_key, client_secret, redirect_uri
            FROM oauth_clients WHERE client_key = ?
            ",
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to query client: {e}")))?;

        row.as_ref().map(row_to_client).transpose()
    }
}

/// Convert a database row to a `Client`
fn row_to_client(row: &SqliteRow) -> AppResult<Client> {
    let id: String = row.get("id");

    Ok(Client {
        id: parse_uuid(&id, "id")?,
        key: row.get("client_key"),
        secret: row.get("client_secret"),
        redirect_uri: row.get("redirect_uri"),
    })
}
