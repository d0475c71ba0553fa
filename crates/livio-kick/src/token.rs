// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OAuth access-token cache with on-demand refresh.
//!
//! Holds one bearer credential and its expiry. A token is served from cache
//! while it has at least [`EXPIRY_MARGIN_SECS`] of validity left; otherwise
//! the cache performs an in-line refresh against the identity token
//! endpoint before returning. The grant depends on configuration: a stored
//! refresh token selects the `refresh_token` grant, otherwise
//! `client_credentials`.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

use livio_config::model::KickConfig;
use livio_core::{body_excerpt, LivioError};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Minimum remaining validity before a cached token is considered stale.
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Timeout for token endpoint requests.
const REFRESH_TIMEOUT: Duration = Duration::from_secs(20);

/// Fallback lifetime when the token response omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// A bearer credential, replaced wholesale on every refresh.
#[derive(Debug, Clone)]
struct Credential {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    /// True while the token has more than the safety margin left.
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at - ChronoDuration::seconds(EXPIRY_MARGIN_SECS)
    }
}

/// Cached OAuth credential with synchronous on-demand refresh.
///
/// A refresh failure propagates [`LivioError::Auth`] and leaves the
/// previous (possibly near-expired) credential in place, so the caller can
/// skip the cycle and try again next poll.
pub struct TokenCache {
    http: reqwest::Client,
    config: KickConfig,
    current: Mutex<Option<Credential>>,
}

impl TokenCache {
    /// Creates a token cache from Kick OAuth settings.
    ///
    /// Requires `client_id` and `client_secret` to be configured.
    pub fn new(config: KickConfig) -> Result<Self, LivioError> {
        if config.client_id.as_deref().unwrap_or("").is_empty() {
            return Err(LivioError::Config(
                "kick.client_id is required for token refresh".into(),
            ));
        }
        if config.client_secret.as_deref().unwrap_or("").is_empty() {
            return Err(LivioError::Config(
                "kick.client_secret is required for token refresh".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(REFRESH_TIMEOUT)
            .build()
            .map_err(|e| LivioError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            current: Mutex::new(None),
        })
    }

    /// Returns a bearer token valid for at least the safety margin.
    ///
    /// Serves the cached token when fresh; otherwise refreshes first. The
    /// internal lock is held across the refresh so concurrent callers never
    /// trigger duplicate refreshes.
    pub async fn get_token(&self) -> Result<String, LivioError> {
        let mut slot = self.current.lock().await;

        if let Some(cred) = slot.as_ref()
            && cred.is_fresh(Utc::now())
        {
            debug!(expires_at = %cred.expires_at, "serving cached access token");
            return Ok(cred.access_token.clone());
        }

        let fresh = self.refresh().await?;
        let token = fresh.access_token.clone();
        *slot = Some(fresh);
        Ok(token)
    }

    /// Performs one token refresh against the identity endpoint.
    async fn refresh(&self) -> Result<Credential, LivioError> {
        // new() guarantees both are present.
        let client_id = self.config.client_id.as_deref().unwrap_or_default();
        let client_secret = self.config.client_secret.as_deref().unwrap_or_default();

        let mut params = vec![
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];
        match self.config.refresh_token.as_deref() {
            Some(refresh_token) => {
                params.push(("grant_type", "refresh_token"));
                params.push(("refresh_token", refresh_token));
                params.push(("redirect_uri", self.config.redirect_uri.as_str()));
            }
            None => params.push(("grant_type", "client_credentials")),
        }

        let resp = self
            .http
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| LivioError::Auth {
                message: format!("token endpoint unreachable: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(LivioError::Auth {
                message: format!(
                    "token endpoint returned {status}: {}",
                    body_excerpt(&body)
                ),
                source: None,
            });
        }

        #[derive(serde::Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: Option<u64>,
        }

        let token_resp: TokenResponse =
            serde_json::from_str(&body).map_err(|e| LivioError::Auth {
                message: format!("failed to parse token response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let expires_in = token_resp.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let expires_at = Utc::now() + ChronoDuration::seconds(expires_in as i64);

        info!(expires_in, "access token refreshed");

        Ok(Credential {
            access_token: token_resp.access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(token_url: String) -> KickConfig {
        KickConfig {
            client_id: Some("client-1".into()),
            client_secret: Some("secret-1".into()),
            token_url,
            ..KickConfig::default()
        }
    }

    fn token_body(token: &str, expires_in: u64) -> serde_json::Value {
        serde_json::json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": expires_in,
        })
    }

    #[test]
    fn new_requires_client_id() {
        let config = KickConfig {
            client_secret: Some("secret".into()),
            ..KickConfig::default()
        };
        assert!(TokenCache::new(config).is_err());
    }

    #[test]
    fn new_requires_client_secret() {
        let config = KickConfig {
            client_id: Some("client".into()),
            ..KickConfig::default()
        };
        assert!(TokenCache::new(config).is_err());
    }

    #[test]
    fn credential_freshness_honors_margin() {
        let now = Utc::now();
        let fresh = Credential {
            access_token: "t".into(),
            expires_at: now + ChronoDuration::seconds(120),
        };
        let stale = Credential {
            access_token: "t".into(),
            expires_at: now + ChronoDuration::seconds(EXPIRY_MARGIN_SECS - 5),
        };
        assert!(fresh.is_fresh(now));
        assert!(!stale.is_fresh(now));
    }

    #[tokio::test]
    async fn token_is_cached_within_margin() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-1", 3600)))
            .expect(1)
            .mount(&server)
            .await;

        let cache = TokenCache::new(test_config(format!("{}/oauth/token", server.uri()))).unwrap();

        let first = cache.get_token().await.unwrap();
        let second = cache.get_token().await.unwrap();
        assert_eq!(first, "tok-1");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn expired_token_triggers_exactly_one_refresh() {
        let server = MockServer::start().await;

        // First credential expires immediately (inside the 30s margin).
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-old", 0)))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-new", 3600)))
            .expect(1)
            .mount(&server)
            .await;

        let cache = TokenCache::new(test_config(format!("{}/oauth/token", server.uri()))).unwrap();

        assert_eq!(cache.get_token().await.unwrap(), "tok-old");
        // Stale now; the next call refreshes once and then serves from cache.
        assert_eq!(cache.get_token().await.unwrap(), "tok-new");
        assert_eq!(cache.get_token().await.unwrap(), "tok-new");
    }

    #[tokio::test]
    async fn refresh_token_grant_sends_stored_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=rt-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-rt", 3600)))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = test_config(format!("{}/oauth/token", server.uri()));
        config.refresh_token = Some("rt-abc".into());

        let cache = TokenCache::new(config).unwrap();
        assert_eq!(cache.get_token().await.unwrap(), "tok-rt");
    }

    #[tokio::test]
    async fn refresh_failure_keeps_previous_credential() {
        let server = MockServer::start().await;

        // One immediately-stale success, then the endpoint starts failing.
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-kept", 0)))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let cache = TokenCache::new(test_config(format!("{}/oauth/token", server.uri()))).unwrap();

        assert_eq!(cache.get_token().await.unwrap(), "tok-kept");

        let err = cache.get_token().await.unwrap_err();
        assert!(matches!(err, LivioError::Auth { .. }), "got: {err:?}");

        // The stale credential is still in the slot, untouched by the failure.
        let slot = cache.current.lock().await;
        assert_eq!(slot.as_ref().unwrap().access_token, "tok-kept");
    }

    #[tokio::test]
    async fn error_status_carries_body_excerpt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_client"}"#),
            )
            .mount(&server)
            .await;

        let cache = TokenCache::new(test_config(format!("{}/oauth/token", server.uri()))).unwrap();
        let err = cache.get_token().await.unwrap_err();
        assert!(err.to_string().contains("invalid_client"), "got: {err}");
    }
}
