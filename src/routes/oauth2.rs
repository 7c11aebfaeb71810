// ABOUTME: OAuth2 token endpoint: client authentication plus grant dispatch
// ABOUTME: Maps typed domain errors to HTTP statuses and stable error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use crate::oauth2::{OauthError, OauthService, TokenRequest};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;
use tracing::error;

/// Routes for the OAuth2 token endpoint
pub struct OauthRoutes;

impl OauthRoutes {
    /// Create the token endpoint routes
    #[must_use]
    pub fn routes(service: Arc<OauthService>) -> Router {
        Router::new()
            .route("/v1/oauth/tokens", post(Self::handle_tokens))
            .with_state(service)
    }

    /// Handle `POST /v1/oauth/tokens`
    async fn handle_tokens(
        State(service): State<Arc<OauthService>>,
        headers: HeaderMap,
        Form(request): Form<TokenRequest>,
    ) -> Response {
        let Some((key, secret)) = client_credentials(&headers, &request) else {
            return error_response(&OauthError::InvalidClient);
        };

        let client = match service.authenticate_client(&key, &secret).await {
            Ok(client) => client,
            Err(e) => return error_response(&e),
        };

        match service.token(&request, &client).await {
            Ok(response) => (StatusCode::OK, Json(response)).into_response(),
            Err(e) => error_response(&e),
        }
    }
}

/// Extract client credentials from Basic auth or the form body
fn client_credentials(headers: &HeaderMap, request: &TokenRequest) -> Option<(String, String)> {
    if let Some(credentials) = basic_auth_credentials(headers) {
        return Some(credentials);
    }

    match (&request.client_id, &request.client_secret) {
        (Some(key), Some(secret)) => Some((key.clone(), secret.clone())),
        _ => None,
    }
}

/// Decode an `Authorization: Basic` header into a (key, secret) pair
fn basic_auth_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let encoded = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Basic ")?;

    let decoded = general_purpose::STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (key, secret) = decoded.split_once(':')?;

    Some((key.to_owned(), secret.to_owned()))
}

/// Render a typed domain error as `{"error": <stable-string>}`
fn error_response(err: &OauthError) -> Response {
    if let OauthError::Store(source) = err {
        error!("token endpoint store failure: {source}");
    }

    (
        err.http_status(),
        Json(serde_json::json!({ "error": err.wire_message() })),
    )
        .into_response()
}
