// ABOUTME: Liveness probe touching the token store
// ABOUTME: Returns 200 while the database answers, 503 otherwise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use crate::oauth2::OauthService;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::error;

/// Routes for the health check endpoint
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check routes
    #[must_use]
    pub fn routes(service: Arc<OauthService>) -> Router {
        Router::new()
            .route("/v1/health", get(Self::handle_health))
            .with_state(service)
    }

    /// Handle `GET /v1/health`
    async fn handle_health(State(service): State<Arc<OauthService>>) -> Response {
        match service.database().ping().await {
            Ok(()) => (
                StatusCode::OK,
                Json(serde_json::json!({ "status": "ok" })),
            )
                .into_response(),
            Err(e) => {
                error!("health check failed: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(serde_json::json!({ "status": "unavailable" })),
                )
                    .into_response()
            }
        }
    }
}
