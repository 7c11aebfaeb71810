// ABOUTME: Database management for the Gatehouse token store
// ABOUTME: Owns the SQLite pool, schema migration, and transaction handles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

//! # Database Management
//!
//! This module provides persistence for clients, users, scopes,
//! authorization codes, refresh tokens, and access tokens. Entity
//! operations are split across submodules; operations that must compose
//! into a caller-held transaction are exposed as connection-level
//! functions alongside the pool-level [`Database`] methods.

pub(crate) mod access_tokens;
pub(crate) mod authorization_codes;
mod clients;
pub(crate) mod refresh_tokens;
mod scopes;
mod users;

use crate::errors::{AppError, AppResult};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

/// Parse a TEXT column back into a UUID
pub(crate) fn parse_uuid(value: &str, column: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| AppError::database(format!("Invalid UUID in column {column}: {e}")))
}

/// Database manager for the token store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot connect to `database_url`
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_url = if database_url.starts_with("sqlite:") && !database_url.contains("memory") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connection_url)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        Ok(Self { pool })
    }

    /// Run schema migrations, creating tables and indexes idempotently
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_identity().await?;
        self.migrate_tokens().await?;
        Ok(())
    }

    /// Check that the database answers queries
    ///
    /// # Errors
    ///
    /// Returns an error if the probe query fails
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Begin a transaction for multi-statement units of work
    pub(crate) async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))
    }

    /// Get a reference to the pool for entity submodules
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create client, user, and scope tables
    async fn migrate_identity(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth_clients (
                id TEXT PRIMARY KEY,
                client_key TEXT NOT NULL UNIQUE,
                client_secret TEXT NOT NULL,
                redirect_uri TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create oauth_clients: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth_users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create oauth_users: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth_scopes (
                id TEXT PRIMARY KEY,
                scope TEXT NOT NULL UNIQUE,
                description TEXT,
                is_default BOOLEAN NOT NULL DEFAULT FALSE
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create oauth_scopes: {e}")))?;

        Ok(())
    }

    /// Create authorization code, refresh token, and access token tables
    async fn migrate_tokens(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth_authorization_codes (
                id TEXT PRIMARY KEY,
                code TEXT NOT NULL UNIQUE,
                redirect_uri TEXT,
                expires_at TIMESTAMP NOT NULL,
                scope TEXT NOT NULL,
                client_id TEXT NOT NULL REFERENCES oauth_clients(id) ON DELETE CASCADE,
                user_id TEXT REFERENCES oauth_users(id) ON DELETE CASCADE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to create oauth_authorization_codes: {e}"))
        })?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_authorization_codes_client \
             ON oauth_authorization_codes(client_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to index authorization codes: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_authorization_codes_user \
             ON oauth_authorization_codes(user_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to index authorization codes: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth_refresh_tokens (
                id TEXT PRIMARY KEY,
                token TEXT NOT NULL UNIQUE,
                expires_at TIMESTAMP NOT NULL,
                scope TEXT NOT NULL,
                client_id TEXT NOT NULL REFERENCES oauth_clients(id) ON DELETE CASCADE,
                user_id TEXT REFERENCES oauth_users(id) ON DELETE CASCADE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create oauth_refresh_tokens: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_refresh_tokens_client_user \
             ON oauth_refresh_tokens(client_id, user_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to index refresh tokens: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth_access_tokens (
                id TEXT PRIMARY KEY,
                token TEXT NOT NULL UNIQUE,
                expires_at TIMESTAMP NOT NULL,
                scope TEXT NOT NULL,
                client_id TEXT NOT NULL REFERENCES oauth_clients(id) ON DELETE CASCADE,
                user_id TEXT REFERENCES oauth_users(id) ON DELETE CASCADE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create oauth_access_tokens: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_access_tokens_client \
             ON oauth_access_tokens(client_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to index access tokens: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_access_tokens_user \
             ON oauth_access_tokens(user_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to index access tokens: {e}")))?;

        Ok(())
    }
}
