// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the status surface.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use livio_core::{LivioError, NotificationIntent, NotifySink, WatchStatus};

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The watcher's status snapshot; written only by the poll loop.
    pub status: Arc<RwLock<WatchStatus>>,
    /// The real notification sink, used by the manual test trigger.
    pub sink: Arc<dyn NotifySink>,
    /// Prebuilt synthetic intent for the test trigger.
    pub test_intent: NotificationIntent,
    /// Authentication configuration for guarded routes.
    pub auth: AuthConfig,
    /// Process start time for uptime reporting.
    pub started_at: Instant,
}

/// Gateway server configuration (mirrors `GatewayConfig` from livio-config
/// to avoid a config-crate dependency here).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// - `GET /health` and `GET /status` are public read-only endpoints.
/// - `POST /v1/test` requires bearer auth (fail-closed without a token).
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/status", get(handlers::get_status))
        .with_state(state.clone());

    let guarded_routes = Router::new()
        .route("/v1/test", post(handlers::post_test))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(guarded_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), LivioError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LivioError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| LivioError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
