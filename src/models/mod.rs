// ABOUTME: Domain data models shared across the persistence and service layers
// ABOUTME: Plain value objects; all persistence detail lives behind the Database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

/// OAuth2 entities: clients, users, scopes, codes, and tokens
pub mod oauth;

pub use oauth::{AccessToken, AuthorizationCode, Client, RefreshToken, Scope, User};
