// ABOUTME: Integration tests for the grant dispatcher and the code exchange
// ABOUTME: Covers scenario flows, failure short-circuits, and the exactly-once race
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use gatehouse::models::{AuthorizationCode, RefreshToken};
use gatehouse::oauth2::OauthError;
use uuid::Uuid;

#[tokio::test]
async fn test_authorization_code_grant_success() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];
    let user = &env.users[0];

    env.database
        .create_authorization_code(&AuthorizationCode {
            id: Uuid::new_v4(),
            code: "test_code".to_owned(),
            redirect_uri: Some("https://www.example.com".to_owned()),
            expires_at: Utc::now() + Duration::seconds(3600),
            scope: "read_write".to_owned(),
            client_id: client.id,
            user_id: Some(user.id),
        })
        .await?;

    let mut request = common::token_request("authorization_code");
    request.code = Some("test_code".to_owned());
    request.redirect_uri = Some("https://www.example.com".to_owned());

    let response = env.service.token(&request, client).await.unwrap();
    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.expires_in, 3600);
    assert_eq!(response.scope, "read_write");
    assert!(!response.access_token.is_empty());
    let refresh_token = response.refresh_token.clone().unwrap();
    assert!(!refresh_token.is_empty());

    // The minted pair is live and carries the code's identity
    let access_token = env.service.authenticate(&response.access_token).await?;
    assert_eq!(access_token.client_id, client.id);
    assert_eq!(access_token.user_id, Some(user.id));
    let refresh = env.service.get_valid_refresh_token(&refresh_token, client).await?;
    assert_eq!(refresh.user_id, Some(user.id));

    // Single-use: the exchanged code is gone
    let err = env
        .service
        .get_valid_authorization_code("test_code", client)
        .await
        .unwrap_err();
    assert!(matches!(err, OauthError::AuthorizationCodeNotFound));

    Ok(())
}

#[tokio::test]
async fn test_authorization_code_grant_redirect_mismatch() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];

    env.database
        .create_authorization_code(&AuthorizationCode {
            id: Uuid::new_v4(),
            code: "test_code".to_owned(),
            redirect_uri: Some("https://www.example.com".to_owned()),
            expires_at: Utc::now() + Duration::seconds(3600),
            scope: "read_write".to_owned(),
            client_id: client.id,
            user_id: Some(env.users[0].id),
        })
        .await?;

    // Missing redirect URI
    let mut request = common::token_request("authorization_code");
    request.code = Some("test_code".to_owned());
    let err = env.service.token(&request, client).await.unwrap_err();
    assert!(matches!(err, OauthError::InvalidRedirectUri));

    // Wrong redirect URI
    request.redirect_uri = Some("https://wrong.example.com".to_owned());
    let err = env.service.token(&request, client).await.unwrap_err();
    assert!(matches!(err, OauthError::InvalidRedirectUri));

    // The failed exchange had no side effects: the code is still valid and
    // no refresh token was minted for the pair
    let still_valid = env
        .service
        .get_valid_authorization_code("test_code", client)
        .await?;
    assert_eq!(still_valid.code, "test_code");
    let minted = env
        .service
        .extend_refresh_token_if_present(client.id, Some(env.users[0].id), 3600)
        .await?;
    assert!(!minted);

    Ok(())
}

#[tokio::test]
async fn test_exactly_once_exchange_under_race() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];

    env.database
        .create_authorization_code(&AuthorizationCode {
            id: Uuid::new_v4(),
            code: "test_code".to_owned(),
            redirect_uri: Some("https://www.example.com".to_owned()),
            expires_at: Utc::now() + Duration::seconds(3600),
            scope: "read_write".to_owned(),
            client_id: client.id,
            user_id: Some(env.users[0].id),
        })
        .await?;

    let mut request = common::token_request("authorization_code");
    request.code = Some("test_code".to_owned());
    request.redirect_uri = Some("https://www.example.com".to_owned());

    let (first, second) = tokio::join!(
        env.service.token(&request, client),
        env.service.token(&request, client),
    );

    // Exactly one exchange wins; the loser observes the code as gone
    let outcomes = [first, second];
    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(successes, 1);
    let failure = outcomes.into_iter().find_map(Result::err).unwrap();
    assert!(matches!(failure, OauthError::AuthorizationCodeNotFound));

    Ok(())
}

#[tokio::test]
async fn test_missing_grant_parameters() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];

    let err = env
        .service
        .token(&common::token_request("authorization_code"), client)
        .await
        .unwrap_err();
    assert!(matches!(err, OauthError::InvalidGrantRequest(_)));

    let err = env
        .service
        .token(&common::token_request("refresh_token"), client)
        .await
        .unwrap_err();
    assert!(matches!(err, OauthError::InvalidGrantRequest(_)));

    Ok(())
}

#[tokio::test]
async fn test_unsupported_grant_type() -> Result<()> {
    let env = common::setup().await?;

    let err = env
        .service
        .token(&common::token_request("password"), &env.clients[0])
        .await
        .unwrap_err();
    assert!(matches!(err, OauthError::UnsupportedGrantType));

    Ok(())
}

#[tokio::test]
async fn test_refresh_token_grant() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];
    let user = &env.users[0];

    let existing = env
        .service
        .get_or_create_refresh_token(client, Some(user.id), 3600, "read_write")
        .await?;

    let mut request = common::token_request("refresh_token");
    request.refresh_token = Some(existing.token.clone());

    let response = env.service.token(&request, client).await.unwrap();
    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.scope, "read_write");

    // A fresh access token bound to the same identity
    let access_token = env.service.authenticate(&response.access_token).await?;
    assert_eq!(access_token.user_id, Some(user.id));

    // No rotation: the same refresh token value is echoed back
    assert_eq!(response.refresh_token.as_deref(), Some(existing.token.as_str()));

    Ok(())
}

#[tokio::test]
async fn test_refresh_token_grant_rejects_invalid_tokens() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];

    env.database
        .create_refresh_token(&RefreshToken {
            id: Uuid::new_v4(),
            token: "test_expired_token".to_owned(),
            expires_at: Utc::now() - Duration::seconds(10),
            scope: "read_write".to_owned(),
            client_id: client.id,
            user_id: None,
        })
        .await?;

    let mut request = common::token_request("refresh_token");
    request.refresh_token = Some("bogus".to_owned());
    let err = env.service.token(&request, client).await.unwrap_err();
    assert!(matches!(err, OauthError::RefreshTokenNotFound));

    request.refresh_token = Some("test_expired_token".to_owned());
    let err = env.service.token(&request, client).await.unwrap_err();
    assert!(matches!(err, OauthError::RefreshTokenExpired));

    Ok(())
}

#[tokio::test]
async fn test_client_credentials_grant() -> Result<()> {
    let env = common::setup().await?;
    let client = &env.clients[0];

    // No requested scope falls back to the defaults
    let response = env
        .service
        .token(&common::token_request("client_credentials"), client)
        .await
        .unwrap();
    assert_eq!(response.scope, "read");
    assert!(response.refresh_token.is_some());

    let access_token = env.service.authenticate(&response.access_token).await?;
    assert!(access_token.is_client_only());

    // A known requested scope is echoed back
    let mut request = common::token_request("client_credentials");
    request.scope = Some("read_write".to_owned());
    let response = env.service.token(&request, client).await.unwrap();
    assert_eq!(response.scope, "read_write");

    // An unknown scope is rejected before any token is minted
    request.scope = Some("unknown_scope".to_owned());
    let err = env.service.token(&request, client).await.unwrap_err();
    assert!(matches!(err, OauthError::InvalidScope));

    Ok(())
}
