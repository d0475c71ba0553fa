// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./livio.toml` > `~/.config/livio/livio.toml` > `/etc/livio/livio.toml`
//! with environment variable overrides via `LIVIO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LivioConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/livio/livio.toml` (system-wide)
/// 3. `~/.config/livio/livio.toml` (user XDG config)
/// 4. `./livio.toml` (local directory)
/// 5. `LIVIO_*` environment variables
pub fn load_config() -> Result<LivioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LivioConfig::default()))
        .merge(Toml::file("/etc/livio/livio.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("livio/livio.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("livio.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<LivioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LivioConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LivioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LivioConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `LIVIO_KICK_CLIENT_ID` must map to
/// `kick.client_id`, not `kick.client.id`.
fn env_provider() -> Env {
    Env::prefixed("LIVIO_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: LIVIO_DISCORD_WEBHOOK_URL -> "discord_webhook_url"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("kick_", "kick.", 1)
            .replacen("discord_", "discord.", 1)
            .replacen("watch_", "watch.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}
