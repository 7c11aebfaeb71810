// ABOUTME: Main library entry point for the Gatehouse OAuth2 token service
// ABOUTME: Wires configuration, persistence, domain service, and HTTP layers together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

#![deny(unsafe_code)]

//! # Gatehouse
//!
//! An OAuth2-style token issuance and bearer-token authentication service.
//! Gatehouse grants, validates, renews, and revokes authorization codes,
//! access tokens, and refresh tokens on behalf of registered clients and
//! (optionally) end users.
//!
//! ## Architecture
//!
//! - **Models**: plain domain entities (clients, users, scopes, codes, tokens)
//! - **Database**: sqlx/SQLite persistence behind a repository-style API
//! - **`OAuth2`**: the domain service implementing the grant state machine,
//!   rolling refresh-token renewal, and bearer authentication
//! - **Routes**: thin axum HTTP layer exposing the token endpoint
//! - **Config**: environment-only configuration snapshots
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gatehouse::config::environment::ServerConfig;
//! use gatehouse::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Gatehouse configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Configuration management (environment-only)
pub mod config;

/// Cryptographic utilities: token value generation and secret comparison
pub mod crypto;

/// Persistence layer over SQLite
pub mod database;

/// Unified error handling with standard error codes
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Domain data models
pub mod models;

/// OAuth2 domain service: grants, tokens, and bearer authentication
pub mod oauth2;

/// HTTP routes for the token endpoint and health checks
pub mod routes;
