// ABOUTME: Integration tests for access token issuance and bearer authentication
// ABOUTME: Covers the sliding-session renewal of the matching refresh token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

mod common;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use gatehouse::models::{AccessToken, RefreshToken};
use gatehouse::oauth2::OauthError;
use uuid::Uuid;

fn access_token_row(
    token: &str,
    expires_at: DateTime<Utc>,
    client_id: Uuid,
    user_id: Option<Uuid>,
) -> AccessToken {
    AccessToken {
        id: Uuid::new_v4(),
        token: token.to_owned(),
        expires_at,
        scope: "read_write".to_owned(),
        client_id,
        user_id,
    }
}

fn refresh_token_row(
    token: &str,
    expires_at: DateTime<Utc>,
    client_id: Uuid,
    user_id: Option<Uuid>,
) -> RefreshToken {
    RefreshToken {
        id: Uuid::new_v4(),
        token: token.to_owned(),
        expires_at,
        scope: "read_write".to_owned(),
        client_id,
        user_id,
    }
}

#[tokio::test]
async fn test_issue_and_authenticate() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];
    let user = &env.users[0];

    let issued = env
        .service
        .issue_access_token(client, Some(user.id), 3600, "read")
        .await?;
    assert!(issued.expires_at > Utc::now());

    let authenticated = env.service.authenticate(&issued.token).await?;
    assert_eq!(authenticated.token, issued.token);
    assert_eq!(authenticated.client_id, client.id);
    assert_eq!(authenticated.user_id, Some(user.id));

    Ok(())
}

#[tokio::test]
async fn test_authenticate_rejects_missing_and_expired_tokens() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];

    env.database
        .create_access_token(&access_token_row(
            "test_expired_token",
            Utc::now() - Duration::seconds(10),
            client.id,
            Some(env.users[0].id),
        ))
        .await?;
    env.database
        .create_access_token(&access_token_row(
            "test_client_token",
            Utc::now() + Duration::seconds(10),
            client.id,
            None,
        ))
        .await?;

    // Empty bearer string
    let err = env.service.authenticate("").await.unwrap_err();
    assert!(matches!(err, OauthError::AccessTokenNotFound));

    // Bogus bearer string
    let err = env.service.authenticate("bogus").await.unwrap_err();
    assert!(matches!(err, OauthError::AccessTokenNotFound));

    // Expired rows stay distinguishable from missing ones
    let err = env
        .service
        .authenticate("test_expired_token")
        .await
        .unwrap_err();
    assert!(matches!(err, OauthError::AccessTokenExpired));

    // A valid client-only token authenticates with no associated user
    let token = env.service.authenticate("test_client_token").await?;
    assert_eq!(token.token, "test_client_token");
    assert_eq!(token.client_id, client.id);
    assert!(token.is_client_only());

    Ok(())
}

#[tokio::test]
async fn test_authenticate_succeeds_without_a_refresh_token() -> Result<()> {
    let env = common::setup().await?;

    env.database
        .create_access_token(&access_token_row(
            "test_token",
            Utc::now() + Duration::seconds(10),
            env.clients[0].id,
            None,
        ))
        .await?;

    // The sliding renewal is best-effort; no refresh token row exists here
    let token = env.service.authenticate("test_token").await?;
    assert_eq!(token.token, "test_token");

    Ok(())
}

#[tokio::test]
async fn test_authenticate_slides_the_matching_refresh_token() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];
    let lifetime = env.config.refresh_token_lifetime;

    let seeded_expiry = Utc::now() + Duration::seconds(10);
    let pairs = [
        ("test_token_1", Some(env.users[0].id)),
        ("test_token_2", None),
        ("test_token_3", Some(env.users[1].id)),
    ];
    for (token, user_id) in pairs {
        env.database
            .create_access_token(&access_token_row(token, seeded_expiry, client.id, user_id))
            .await?;
        env.database
            .create_refresh_token(&refresh_token_row(token, seeded_expiry, client.id, user_id))
            .await?;
    }

    let expires_at = |token: &str| {
        let database = env.database.clone();
        let token = token.to_owned();
        let client_id = client.id;
        async move {
            database
                .get_refresh_token(&token, client_id)
                .await
                .unwrap()
                .unwrap()
                .expires_at
        }
    };
    let assert_slid = |actual: DateTime<Utc>, from: DateTime<Utc>| {
        let expected = from + Duration::seconds(lifetime);
        assert!((actual.timestamp() - expected.timestamp()).abs() <= 2);
    };

    // First authentication extends only the (client, user1) refresh token
    let now1 = Utc::now();
    let token = env.service.authenticate("test_token_1").await?;
    assert_eq!(token.user_id, Some(env.users[0].id));
    assert_slid(expires_at("test_token_1").await, now1);
    assert_eq!(expires_at("test_token_2").await.timestamp(), seeded_expiry.timestamp());
    assert_eq!(expires_at("test_token_3").await.timestamp(), seeded_expiry.timestamp());

    // Second authentication extends only the client-only refresh token
    let now2 = Utc::now();
    let token = env.service.authenticate("test_token_2").await?;
    assert!(token.is_client_only());
    assert_slid(expires_at("test_token_1").await, now1);
    assert_slid(expires_at("test_token_2").await, now2);
    assert_eq!(expires_at("test_token_3").await.timestamp(), seeded_expiry.timestamp());

    // Third authentication extends the remaining pair
    let now3 = Utc::now();
    let token = env.service.authenticate("test_token_3").await?;
    assert_eq!(token.user_id, Some(env.users[1].id));
    assert_slid(expires_at("test_token_1").await, now1);
    assert_slid(expires_at("test_token_2").await, now2);
    assert_slid(expires_at("test_token_3").await, now3);

    Ok(())
}

#[tokio::test]
async fn test_repeated_authentication_extends_the_same_refresh_token() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];
    let user = &env.users[0];

    // Two access tokens for the same (client, user) pair, one refresh token
    env.database
        .create_access_token(&access_token_row(
            "test_token_a",
            Utc::now() + Duration::seconds(60),
            client.id,
            Some(user.id),
        ))
        .await?;
    env.database
        .create_access_token(&access_token_row(
            "test_token_b",
            Utc::now() + Duration::seconds(60),
            client.id,
            Some(user.id),
        ))
        .await?;
    env.database
        .create_refresh_token(&refresh_token_row(
            "test_refresh",
            Utc::now() + Duration::seconds(60),
            client.id,
            Some(user.id),
        ))
        .await?;

    env.service.authenticate("test_token_a").await?;
    let first = env
        .database
        .get_refresh_token("test_refresh", client.id)
        .await?
        .unwrap()
        .expires_at;

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    // A different access token for the same pair slides the same row again
    env.service.authenticate("test_token_b").await?;
    let second = env
        .database
        .get_refresh_token("test_refresh", client.id)
        .await?
        .unwrap()
        .expires_at;

    assert!(second > first);

    Ok(())
}
