// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord webhook notification sink.
//!
//! Posts a [`NotificationIntent`] as a JSON webhook body. On HTTP 429 the
//! sink sleeps for the retry-after duration advertised by the response and
//! retries exactly once; a second failure of any kind surfaces as
//! [`LivioError::Delivery`] and is left for the next poll cycle.

use std::time::Duration;

use async_trait::async_trait;
use livio_config::model::DiscordConfig;
use livio_core::{body_excerpt, LivioError, NotificationIntent, NotifySink};
use tracing::{debug, warn};

/// Timeout for webhook requests.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(20);

/// Backoff when a 429 body carries no parseable retry-after.
const RETRY_AFTER_DEFAULT: Duration = Duration::from_secs(30);

/// Backoff when the 429 came from an edge/CDN block rather than the
/// application rate limiter (non-JSON body with a block marker). Also the
/// cap applied to advertised retry-after values.
const RETRY_AFTER_EDGE_BLOCK: Duration = Duration::from_secs(300);

/// Webhook sink implementing [`NotifySink`].
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// Creates a sink for the configured webhook URL.
    pub fn new(config: &DiscordConfig) -> Result<Self, LivioError> {
        let url = config
            .webhook_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                LivioError::Config("discord.webhook_url is required for delivery".into())
            })?
            .to_string();

        let http = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(|e| LivioError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, url })
    }
}

#[async_trait]
impl NotifySink for WebhookSink {
    async fn deliver(&self, intent: &NotificationIntent) -> Result<u16, LivioError> {
        let payload = webhook_payload(intent);

        for attempt in 0..=1u32 {
            let resp = self
                .http
                .post(&self.url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| LivioError::Delivery {
                    status: None,
                    body_excerpt: format!("webhook request failed: {e}"),
                })?;

            let status = resp.status();
            if status.is_success() {
                debug!(status = %status, attempt, "notification delivered");
                return Ok(status.as_u16());
            }

            let body = resp.text().await.unwrap_or_default();

            if status.as_u16() == 429 && attempt == 0 {
                let delay = retry_after_delay(&body);
                warn!(
                    delay_secs = delay.as_secs_f64(),
                    "webhook rate limited, retrying once after backoff"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            return Err(LivioError::Delivery {
                status: Some(status.as_u16()),
                body_excerpt: body_excerpt(&body),
            });
        }

        Err(LivioError::Delivery {
            status: None,
            body_excerpt: "delivery failed after retry".into(),
        })
    }
}

/// Build the webhook JSON body from an intent.
fn webhook_payload(intent: &NotificationIntent) -> serde_json::Value {
    let mut payload = serde_json::json!({ "content": intent.content });
    if let Some(ref embed) = intent.embed {
        payload["embeds"] = serde_json::json!([{
            "title": embed.title,
            "url": embed.url,
            "description": embed.description,
        }]);
    }
    payload
}

/// Decide how long to back off after a 429 response.
///
/// Discord's application rate limiter answers with a JSON body carrying
/// `retry_after` in (possibly fractional) seconds. A non-JSON body with an
/// edge-block marker gets the long fallback; anything else the default.
fn retry_after_delay(body: &str) -> Duration {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(secs) = value.get("retry_after").and_then(serde_json::Value::as_f64) {
            let capped = secs.clamp(0.0, RETRY_AFTER_EDGE_BLOCK.as_secs_f64());
            return Duration::from_secs_f64(capped);
        }
        return RETRY_AFTER_DEFAULT;
    }

    let lower = body.to_ascii_lowercase();
    if lower.contains("error code: 1015") || lower.contains("cloudflare") {
        RETRY_AFTER_EDGE_BLOCK
    } else {
        RETRY_AFTER_DEFAULT
    }
}
