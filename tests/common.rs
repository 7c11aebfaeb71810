// ABOUTME: Shared test fixtures: in-memory store, seeded clients, users, and scopes
// ABOUTME: Mirrors the fixture data the grant flows expect in production
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project
#![allow(dead_code)]

use anyhow::Result;
use gatehouse::config::oauth::OauthConfig;
use gatehouse::database::Database;
use gatehouse::models::{Client, Scope, User};
use gatehouse::oauth2::{OauthService, TokenRequest};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// A fully seeded test environment
pub struct TestEnv {
    pub service: Arc<OauthService>,
    pub database: Database,
    pub config: Arc<OauthConfig>,
    pub clients: Vec<Client>,
    pub users: Vec<User>,
}

/// Create an in-memory store seeded with two clients, two users, and scopes
///
/// The pool is capped at one connection so every test exercises the same
/// in-memory database.
pub async fn setup() -> Result<TestEnv> {
    init_test_logging();

    let database = Database::new("sqlite::memory:", 1).await?;
    database.migrate().await?;

    let clients = vec![
        Client {
            id: Uuid::new_v4(),
            key: "test_client".to_owned(),
            secret: "test_secret".to_owned(),
            redirect_uri: Some("https://www.example.com".to_owned()),
        },
        Client {
            id: Uuid::new_v4(),
            key: "other_client".to_owned(),
            secret: "other_secret".to_owned(),
            redirect_uri: None,
        },
    ];
    for client in &clients {
        database.create_client(client).await?;
    }

    let users = vec![
        User {
            id: Uuid::new_v4(),
            username: "test@user".to_owned(),
            password: None,
        },
        User {
            id: Uuid::new_v4(),
            username: "test@user2".to_owned(),
            password: None,
        },
    ];
    for user in &users {
        database.create_user(user).await?;
    }

    for (scope, is_default) in [("read", true), ("read_write", false)] {
        database
            .create_scope(&Scope {
                id: Uuid::new_v4(),
                scope: scope.to_owned(),
                description: None,
                is_default,
            })
            .await?;
    }

    let config = Arc::new(OauthConfig::default());
    let service = Arc::new(OauthService::new(database.clone(), config.clone()));

    Ok(TestEnv {
        service,
        database,
        config,
        clients,
        users,
    })
}

/// Build a token request with everything optional left empty
pub fn token_request(grant_type: &str) -> TokenRequest {
    TokenRequest {
        grant_type: grant_type.to_owned(),
        code: None,
        redirect_uri: None,
        refresh_token: None,
        scope: None,
        client_id: None,
        client_secret: None,
    }
}
