// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Livio watcher.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Livio configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values;
/// `livio serve` enforces the presence of the Kick and Discord credentials
/// it cannot run without.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LivioConfig {
    /// Process identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Kick.com API and OAuth settings.
    #[serde(default)]
    pub kick: KickConfig,

    /// Discord webhook settings.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Poll loop tuning.
    #[serde(default)]
    pub watch: WatchConfig,

    /// Status gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "livio".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Kick.com API and OAuth configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KickConfig {
    /// Channel slug to watch. `None` disables the watcher (serve refuses to start).
    #[serde(default)]
    pub channel: Option<String>,

    /// OAuth application client ID.
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth application client secret.
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Long-lived refresh token from `livio login`. When set, token refresh
    /// uses the refresh-token grant; otherwise client credentials.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Redirect URI registered with the OAuth application. Sent with the
    /// refresh-token grant and used by `livio login`.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// OAuth token endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Base URL of the Kick public API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for KickConfig {
    fn default() -> Self {
        Self {
            channel: None,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            redirect_uri: default_redirect_uri(),
            token_url: default_token_url(),
            api_base: default_api_base(),
        }
    }
}

fn default_redirect_uri() -> String {
    "http://localhost:3646/callback".to_string()
}

fn default_token_url() -> String {
    "https://id.kick.com/oauth/token".to_string()
}

fn default_api_base() -> String {
    "https://api.kick.com".to_string()
}

/// Discord webhook configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    /// Webhook URL to post notifications to. `None` disables delivery
    /// (serve refuses to start).
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Role ID mentioned at the start of each notification, if set.
    #[serde(default)]
    pub mention_role_id: Option<String>,
}

/// Poll loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
    /// Seconds between poll cycles. Values below the upstream-friendly
    /// minimum of 120 are clamped up at startup.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Minimum offline duration (seconds) after which a live observation is
    /// treated as a new broadcast session.
    #[serde(default = "default_offline_reset_secs")]
    pub offline_reset_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            offline_reset_secs: default_offline_reset_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    120
}

fn default_offline_reset_secs() -> u64 {
    300
}

/// Status gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Enable the status gateway.
    #[serde(default = "default_gateway_enabled")]
    pub enabled: bool,

    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token guarding the manual test trigger. When unset, the
    /// trigger endpoint rejects all requests (fail-closed).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: default_gateway_enabled(),
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_enabled() -> bool {
    true
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    3646
}
