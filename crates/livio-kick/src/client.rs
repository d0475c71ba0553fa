// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel status fetcher for the Kick public API.
//!
//! Calls `GET {api_base}/public/v1/channels?slug={channel}` with a bearer
//! token from the [`TokenCache`] and normalizes the payload into a
//! [`ChannelSnapshot`]. The session key derives from the stream start time
//! when present, with a title+category composite as fallback, and is never
//! set while the channel is offline (a stale start-time field on an offline
//! channel means "has streamed before", not "is streaming now").

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use livio_config::model::KickConfig;
use livio_core::{body_excerpt, ChannelSnapshot, LivioError, StatusSource};
use tracing::debug;

use crate::token::TokenCache;

/// Timeout for channel status requests.
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Bearer-authenticated Kick channel status client.
pub struct KickClient {
    http: reqwest::Client,
    api_base: String,
    tokens: Arc<TokenCache>,
}

impl KickClient {
    /// Creates a status client against the configured API base.
    pub fn new(config: &KickConfig, tokens: Arc<TokenCache>) -> Result<Self, LivioError> {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| LivioError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            tokens,
        })
    }
}

#[async_trait]
impl StatusSource for KickClient {
    async fn fetch(&self, channel: &str) -> Result<ChannelSnapshot, LivioError> {
        let token = self.tokens.get_token().await?;

        let url = format!("{}/public/v1/channels", self.api_base);
        let resp = self
            .http
            .get(&url)
            .query(&[("slug", channel)])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| LivioError::Upstream {
                status: None,
                body_excerpt: format!("channel request failed: {e}"),
            })?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if status.as_u16() >= 400 {
            return Err(LivioError::Upstream {
                status: Some(status.as_u16()),
                body_excerpt: body_excerpt(&body),
            });
        }

        let payload: serde_json::Value =
            serde_json::from_str(&body).map_err(|_| LivioError::Upstream {
                status: Some(status.as_u16()),
                body_excerpt: body_excerpt(&body),
            })?;

        let entry = payload
            .get("data")
            .and_then(serde_json::Value::as_array)
            .and_then(|data| data.first())
            .ok_or_else(|| LivioError::Upstream {
                status: Some(status.as_u16()),
                body_excerpt: format!("no channel data for slug `{channel}`"),
            })?;

        let snapshot = snapshot_from_payload(entry);
        debug!(
            channel,
            live = snapshot.is_live,
            session_key = snapshot.session_key.as_deref().unwrap_or("-"),
            "channel status fetched"
        );
        Ok(snapshot)
    }
}

/// Normalize one channel payload entry into a snapshot.
fn snapshot_from_payload(entry: &serde_json::Value) -> ChannelSnapshot {
    let stream = entry.get("stream");

    let is_live = stream
        .and_then(|s| s.get("is_live"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);

    let title = entry
        .get("stream_title")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    let category = entry
        .get("category")
        .and_then(|c| c.get("name"))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from);

    let session_key = if is_live {
        session_key_for(stream, title.as_deref(), category.as_deref())
    } else {
        None
    };

    ChannelSnapshot {
        is_live,
        session_key,
        title,
        category,
    }
}

/// Derive the session key for a live stream.
///
/// The start time is the real session identifier when the API supplies it;
/// otherwise a title+category composite approximates one.
fn session_key_for(
    stream: Option<&serde_json::Value>,
    title: Option<&str>,
    category: Option<&str>,
) -> Option<String> {
    let start_time = stream
        .and_then(|s| s.get("start_time"))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(start) = start_time {
        return Some(start.to_string());
    }

    match (title, category) {
        (None, None) => None,
        (title, category) => Some(format!(
            "{}|{}",
            title.unwrap_or_default(),
            category.unwrap_or_default()
        )),
    }
}
