// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Composes database, OAuth2, and logging settings into one snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use crate::config::oauth::OauthConfig;
use crate::errors::{AppError, AppResult};
use crate::logging::LoggingConfig;
use std::env;

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Complete server configuration
///
/// Loaded once at startup; managers receive immutable snapshots of the
/// sections they need, so in-flight operations always see a consistent view.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server
    pub http_port: u16,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// OAuth2 lifetimes and grant policy
    pub oauth: OauthConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse
    pub fn from_env() -> AppResult<Self> {
        let http_port = parse_env_var("HTTP_PORT", DEFAULT_HTTP_PORT)?;

        Ok(Self {
            http_port,
            database: DatabaseConfig::from_env()?,
            oauth: OauthConfig::from_env()?,
            logging: LoggingConfig::from_env(),
        })
    }
}

impl DatabaseConfig {
    /// Load database settings from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_MAX_CONNECTIONS` fails to parse
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:gatehouse.db".to_owned()),
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS", 5)?,
        })
    }
}

/// Parse an environment variable, falling back to a default when unset
pub(crate) fn parse_env_var<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("Invalid value for {key}: {raw}"))),
        Err(_) => Ok(default),
    }
}
