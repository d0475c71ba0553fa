// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete Livio pipeline.
//!
//! Each test wires the real credential cache, fetcher, tracker, and webhook
//! sink against wiremock stand-ins for the Kick API and the Discord
//! webhook, then steps the watcher through poll cycles deterministically.

use std::sync::Arc;

use livio_config::model::{DiscordConfig, KickConfig};
use livio_core::WatchStatus;
use livio_discord::WebhookSink;
use livio_kick::{KickClient, TokenCache};
use livio_watch::{IntentFormatter, SessionTracker, Watcher};
use tokio::sync::RwLock;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn kick_config(server: &MockServer) -> KickConfig {
    KickConfig {
        channel: Some("example".into()),
        client_id: Some("client-1".into()),
        client_secret: Some("secret-1".into()),
        token_url: format!("{}/oauth/token", server.uri()),
        api_base: server.uri(),
        ..KickConfig::default()
    }
}

async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok-e2e",
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}

fn channels_body(is_live: bool) -> serde_json::Value {
    let stream = if is_live {
        serde_json::json!({"is_live": true, "start_time": "2026-08-06T20:00:00Z"})
    } else {
        serde_json::json!({"is_live": false})
    };
    serde_json::json!({
        "data": [{
            "slug": "example",
            "stream": stream,
            "stream_title": "Launch Day",
            "category": {"name": "Just Chatting"},
        }],
        "message": "OK",
    })
}

struct Pipeline {
    watcher: Watcher<KickClient, Arc<WebhookSink>>,
    status: Arc<RwLock<WatchStatus>>,
}

fn build_pipeline(kick: &MockServer, webhook: &MockServer) -> Pipeline {
    let config = kick_config(kick);
    let tokens = Arc::new(TokenCache::new(config.clone()).unwrap());
    let source = KickClient::new(&config, tokens).unwrap();

    let sink = Arc::new(
        WebhookSink::new(&DiscordConfig {
            webhook_url: Some(format!("{}/api/webhooks/1/token", webhook.uri())),
            mention_role_id: None,
        })
        .unwrap(),
    );

    let tracker = SessionTracker::new(IntentFormatter::new("example", None), 300);
    let status = Arc::new(RwLock::new(WatchStatus::new("example", 120)));
    let watcher = Watcher::new(source, sink, tracker, "example", 120, status.clone());

    Pipeline { watcher, status }
}

#[tokio::test]
async fn offline_to_live_notifies_exactly_once() {
    let kick = MockServer::start().await;
    let webhook = MockServer::start().await;
    mount_token_endpoint(&kick).await;

    // First poll sees the channel offline, every later poll sees it live.
    Mock::given(method("GET"))
        .and(path("/public/v1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(channels_body(false)))
        .up_to_n_times(1)
        .mount(&kick)
        .await;
    Mock::given(method("GET"))
        .and(path("/public/v1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(channels_body(true)))
        .mount(&kick)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .and(body_partial_json(serde_json::json!({
            "content": "🔴 **LIVE NOW!**\nhttps://kick.com/example"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&webhook)
        .await;

    let mut pipeline = build_pipeline(&kick, &webhook);

    pipeline.watcher.poll_once().await;
    {
        let status = pipeline.status.read().await;
        assert!(!status.live);
        assert!(status.last_error.is_none());
    }

    // The live transition delivers; staying live does not deliver again
    // (the webhook mock's expect(1) is verified on drop).
    pipeline.watcher.poll_once().await;
    pipeline.watcher.poll_once().await;
    pipeline.watcher.poll_once().await;

    let status = pipeline.status.read().await;
    assert!(status.live);
    assert!(status.last_error.is_none());
    assert!(status.last_poll_at.is_some());
}

#[tokio::test]
async fn rate_limited_webhook_records_error_and_loop_survives() {
    let kick = MockServer::start().await;
    let webhook = MockServer::start().await;
    mount_token_endpoint(&kick).await;

    Mock::given(method("GET"))
        .and(path("/public/v1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(channels_body(true)))
        .mount(&kick)
        .await;

    // Both the initial attempt and the sink's single retry are limited.
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(serde_json::json!({"retry_after": 0.05, "global": false})),
        )
        .expect(2)
        .mount(&webhook)
        .await;

    let mut pipeline = build_pipeline(&kick, &webhook);

    pipeline.watcher.poll_once().await;
    {
        let status = pipeline.status.read().await;
        let err = status.last_error.as_deref().unwrap();
        assert!(err.contains("delivery error (429)"), "got: {err}");
    }

    // The next cycle runs normally; the session is already marked announced
    // so no further webhook traffic happens.
    pipeline.watcher.poll_once().await;
    let status = pipeline.status.read().await;
    assert!(status.live);
    assert!(status.last_error.is_none());
}

#[tokio::test]
async fn upstream_outage_is_cycle_local() {
    let kick = MockServer::start().await;
    let webhook = MockServer::start().await;
    mount_token_endpoint(&kick).await;

    Mock::given(method("GET"))
        .and(path("/public/v1/channels"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .up_to_n_times(1)
        .mount(&kick)
        .await;
    Mock::given(method("GET"))
        .and(path("/public/v1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(channels_body(true)))
        .mount(&kick)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&webhook)
        .await;

    let mut pipeline = build_pipeline(&kick, &webhook);

    pipeline.watcher.poll_once().await;
    {
        let status = pipeline.status.read().await;
        assert!(status.last_error.as_deref().unwrap().contains("502"));
    }

    // Recovery on the next cycle still announces the live transition.
    pipeline.watcher.poll_once().await;
    let status = pipeline.status.read().await;
    assert!(status.live);
    assert!(status.last_error.is_none());
}

#[tokio::test]
async fn gateway_test_trigger_reaches_webhook() {
    let webhook = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&webhook)
        .await;

    let sink = Arc::new(
        WebhookSink::new(&DiscordConfig {
            webhook_url: Some(format!("{}/api/webhooks/1/token", webhook.uri())),
            mention_role_id: None,
        })
        .unwrap(),
    );

    let formatter = IntentFormatter::new("example", None);
    let state = livio_gateway::GatewayState {
        status: Arc::new(RwLock::new(WatchStatus::new("example", 120))),
        sink,
        test_intent: formatter.test_intent(),
        auth: livio_gateway::AuthConfig {
            bearer_token: Some("gw-secret".into()),
        },
        started_at: std::time::Instant::now(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, livio_gateway::build_router(state))
            .await
            .unwrap();
    });

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/v1/test"))
        .bearer_auth("gw-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["delivered"], true);
    assert_eq!(body["webhook_status"], 204);
}
