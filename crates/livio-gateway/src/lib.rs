// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP status surface for the Livio watcher.
//!
//! A thin axum server exposing the watcher's per-cycle status snapshot
//! (`GET /status`), a health endpoint (`GET /health`), and a
//! bearer-guarded manual test trigger (`POST /v1/test`) that exercises the
//! real notification sink. The gateway never mutates watcher state; it
//! holds the shared [`livio_core::WatchStatus`] read-only.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{build_router, start_server, GatewayState, ServerConfig};
