// ABOUTME: HTTP route assembly for the Gatehouse service
// ABOUTME: Thin axum layer; all protocol logic stays in the OauthService
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

/// Bearer-token authentication helper for request middleware
pub mod auth;

/// Liveness probe
pub mod health;

/// Token endpoint
pub mod oauth2;

use crate::oauth2::OauthService;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the full application router
#[must_use]
pub fn router(service: Arc<OauthService>) -> Router {
    Router::new()
        .merge(oauth2::OauthRoutes::routes(service.clone()))
        .merge(health::HealthRoutes::routes(service))
        .layer(TraceLayer::new_for_http())
}
