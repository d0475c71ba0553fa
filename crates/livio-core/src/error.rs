// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Livio watcher.

use thiserror::Error;

/// Maximum number of characters of an HTTP response body kept in an error.
const BODY_EXCERPT_MAX: usize = 200;

/// The primary error type used across the Livio workspace.
///
/// The three cycle-local kinds (`Auth`, `Upstream`, `Delivery`) are caught
/// and recorded by the poll loop every cycle; they never terminate the
/// process. `Config` is a startup-time failure only.
#[derive(Debug, Error)]
pub enum LivioError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Credential refresh failed; no usable access token for this cycle.
    #[error("auth error: {message}")]
    Auth {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The channel-status API returned an error status or an empty payload.
    /// A `None` status means the request never produced a response
    /// (connect failure, timeout).
    #[error("upstream error ({}): {body_excerpt}", status_label(.status))]
    Upstream {
        status: Option<u16>,
        body_excerpt: String,
    },

    /// The webhook rejected the notification after the single retry.
    #[error("delivery error ({}): {body_excerpt}", status_label(.status))]
    Delivery {
        status: Option<u16>,
        body_excerpt: String,
    },

    /// Status gateway errors (bind failure, server error).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "transport".to_string(),
    }
}

/// Truncate a response body for inclusion in an error message.
///
/// Keeps at most [`BODY_EXCERPT_MAX`] characters, respecting char
/// boundaries, and collapses the tail into an ellipsis marker.
pub fn body_excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_MAX {
        return body.to_string();
    }
    let mut excerpt: String = body.chars().take(BODY_EXCERPT_MAX).collect();
    excerpt.push_str("...");
    excerpt
}
