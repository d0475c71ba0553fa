// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the status gateway.
//!
//! Handles GET /health, GET /status, POST /v1/test.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::{error, info};

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Process uptime in seconds.
    pub uptime_secs: u64,
}

/// Response body for POST /v1/test.
#[derive(Debug, Serialize)]
pub struct TestTriggerResponse {
    /// Whether the webhook accepted the test notification.
    pub delivered: bool,
    /// Final HTTP status from the webhook, when one was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_status: Option<u16>,
    /// Error description on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// GET /status
///
/// Serves the watcher's most recent status snapshot verbatim.
pub async fn get_status(State(state): State<GatewayState>) -> impl IntoResponse {
    let status = state.status.read().await.clone();
    Json(status)
}

/// POST /v1/test
///
/// Pushes a synthetic notification through the real sink so the full
/// delivery path (webhook URL, rate limiting, formatting) can be exercised
/// without waiting for a live transition.
pub async fn post_test(State(state): State<GatewayState>) -> impl IntoResponse {
    info!("manual test notification triggered");

    match state.sink.deliver(&state.test_intent).await {
        Ok(webhook_status) => (
            StatusCode::OK,
            Json(TestTriggerResponse {
                delivered: true,
                webhook_status: Some(webhook_status),
                error: None,
            }),
        ),
        Err(e) => {
            error!(error = %e, "test notification delivery failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(TestTriggerResponse {
                    delivered: false,
                    webhook_status: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
