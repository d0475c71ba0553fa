// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `livio serve` command implementation.
//!
//! Wires the credential cache, status fetcher, session tracker, webhook
//! sink, and status gateway together and runs the poll loop until a
//! shutdown signal arrives.

use std::sync::Arc;
use std::time::Instant;

use livio_config::model::LivioConfig;
use livio_core::{LivioError, NotifySink, WatchStatus};
use livio_discord::WebhookSink;
use livio_gateway::{AuthConfig, GatewayState, ServerConfig};
use livio_kick::{KickClient, TokenCache};
use livio_watch::{IntentFormatter, SessionTracker, Watcher};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::shutdown;

/// Runs the `livio serve` command.
///
/// Missing required configuration (channel slug, webhook URL, OAuth client
/// credentials) is a hard failure here, before any network activity.
pub async fn run_serve(config: LivioConfig) -> Result<(), LivioError> {
    init_tracing(&config.agent.log_level);

    info!(agent = config.agent.name.as_str(), "starting livio serve");

    let channel = config
        .kick
        .channel
        .clone()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| {
            eprintln!(
                "error: no channel configured. Set kick.channel in livio.toml \
                 or the LIVIO_KICK_CHANNEL environment variable."
            );
            LivioError::Config("kick.channel is required".into())
        })?;

    // TokenCache::new enforces client_id/client_secret presence.
    let tokens = Arc::new(TokenCache::new(config.kick.clone()).inspect_err(|e| {
        error!(error = %e, "failed to initialize credential cache");
        eprintln!(
            "error: Kick OAuth credentials required. Set kick.client_id and \
             kick.client_secret, then run `livio login` for a refresh token."
        );
    })?);

    let source = KickClient::new(&config.kick, tokens)?;

    let sink = Arc::new(WebhookSink::new(&config.discord).inspect_err(|e| {
        error!(error = %e, "failed to initialize webhook sink");
        eprintln!(
            "error: Discord webhook required. Set discord.webhook_url or the \
             LIVIO_DISCORD_WEBHOOK_URL environment variable."
        );
    })?);

    let formatter = IntentFormatter::new(channel.as_str(), config.discord.mention_role_id.clone());
    let tracker = SessionTracker::new(formatter.clone(), config.watch.offline_reset_secs);

    let status = Arc::new(RwLock::new(WatchStatus::new(
        channel.as_str(),
        config.watch.poll_interval_secs,
    )));

    let watcher = Watcher::new(
        source,
        sink.clone(),
        tracker,
        channel.as_str(),
        config.watch.poll_interval_secs,
        status.clone(),
    );
    // Reflect the effective (post-clamp) interval on the status surface.
    status.write().await.poll_interval_secs = watcher.poll_interval().as_secs();

    // Start the status gateway (if enabled).
    if config.gateway.enabled {
        let state = GatewayState {
            status: status.clone(),
            sink: sink.clone() as Arc<dyn NotifySink>,
            test_intent: formatter.test_intent(),
            auth: AuthConfig {
                bearer_token: config.gateway.bearer_token.clone(),
            },
            started_at: Instant::now(),
        };
        let server_config = ServerConfig {
            host: config.gateway.host.clone(),
            port: config.gateway.port,
        };
        tokio::spawn(async move {
            if let Err(e) = livio_gateway::start_server(&server_config, state).await {
                error!(error = %e, "gateway server error");
            }
        });
    } else {
        info!("status gateway disabled by configuration");
    }

    // Install signal handler and run the poll loop on this task.
    let cancel = shutdown::install_signal_handler();
    watcher.run(cancel).await;

    info!("livio serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,livio={log_level},livio_kick={log_level},livio_discord={log_level},\
             livio_watch={log_level},livio_gateway={log_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
