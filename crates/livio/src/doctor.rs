// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `livio doctor` command implementation.
//!
//! Runs diagnostic checks against the configured environment: credentials,
//! channel visibility, webhook reachability, and the local gateway.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::{Duration, Instant};

use livio_config::model::LivioConfig;
use livio_core::{LivioError, StatusSource};
use livio_kick::{KickClient, TokenCache};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, started: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: started.elapsed(),
        }
    }
}

/// Run the `livio doctor` command.
pub async fn run_doctor(config: &LivioConfig, plain: bool) -> Result<(), LivioError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_credentials(config).await,
        check_channel(config).await,
        check_webhook(config).await,
        check_gateway(config).await,
    ];

    println!();
    println!("  livio doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        let duration_ms = result.duration.as_millis();
        let line = match result.status {
            CheckStatus::Pass => {
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<14} {} ({duration_ms}ms)",
                        "✓".green(),
                        result.name,
                        result.message
                    )
                } else {
                    format!(
                        "    [OK]   {:<14} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Warn => {
                warn_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<14} {} ({duration_ms}ms)",
                        "!".yellow(),
                        result.name,
                        result.message.yellow()
                    )
                } else {
                    format!(
                        "    [WARN] {:<14} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Fail => {
                fail_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<14} {} ({duration_ms}ms)",
                        "✗".red(),
                        result.name,
                        result.message.red()
                    )
                } else {
                    format!(
                        "    [FAIL] {:<14} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
        };
        println!("{line}");
    }

    println!();
    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

/// OAuth credentials are configured and the token endpoint accepts them.
async fn check_credentials(config: &LivioConfig) -> CheckResult {
    let started = Instant::now();

    let cache = match TokenCache::new(config.kick.clone()) {
        Ok(cache) => cache,
        Err(_) => {
            return CheckResult::new(
                "credentials",
                CheckStatus::Warn,
                "kick.client_id / kick.client_secret not configured",
                started,
            );
        }
    };

    match cache.get_token().await {
        Ok(_) => CheckResult::new("credentials", CheckStatus::Pass, "token refresh ok", started),
        Err(e) => CheckResult::new("credentials", CheckStatus::Fail, e.to_string(), started),
    }
}

/// The configured channel resolves on the channels endpoint.
async fn check_channel(config: &LivioConfig) -> CheckResult {
    let started = Instant::now();

    let Some(channel) = config.kick.channel.as_deref().filter(|c| !c.is_empty()) else {
        return CheckResult::new(
            "channel",
            CheckStatus::Warn,
            "kick.channel not configured",
            started,
        );
    };

    let client = match TokenCache::new(config.kick.clone())
        .map(Arc::new)
        .and_then(|tokens| KickClient::new(&config.kick, tokens))
    {
        Ok(client) => client,
        Err(e) => return CheckResult::new("channel", CheckStatus::Fail, e.to_string(), started),
    };

    match client.fetch(channel).await {
        Ok(snapshot) => CheckResult::new(
            "channel",
            CheckStatus::Pass,
            format!(
                "`{channel}` found ({})",
                if snapshot.is_live { "live" } else { "offline" }
            ),
            started,
        ),
        Err(e) => CheckResult::new("channel", CheckStatus::Fail, e.to_string(), started),
    }
}

/// The webhook URL answers a GET (Discord serves webhook metadata without
/// consuming a message).
async fn check_webhook(config: &LivioConfig) -> CheckResult {
    let started = Instant::now();

    let Some(url) = config.discord.webhook_url.as_deref().filter(|u| !u.is_empty()) else {
        return CheckResult::new(
            "webhook",
            CheckStatus::Warn,
            "discord.webhook_url not configured",
            started,
        );
    };

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return CheckResult::new("webhook", CheckStatus::Fail, e.to_string(), started);
        }
    };

    match client.get(url).send().await {
        Ok(resp) if resp.status().is_success() => {
            CheckResult::new("webhook", CheckStatus::Pass, "webhook reachable", started)
        }
        Ok(resp) => CheckResult::new(
            "webhook",
            CheckStatus::Fail,
            format!("webhook returned {}", resp.status()),
            started,
        ),
        Err(e) => CheckResult::new(
            "webhook",
            CheckStatus::Fail,
            format!("webhook unreachable: {e}"),
            started,
        ),
    }
}

/// A running watcher's gateway answers its health endpoint.
async fn check_gateway(config: &LivioConfig) -> CheckResult {
    let started = Instant::now();

    if !config.gateway.enabled {
        return CheckResult::new(
            "gateway",
            CheckStatus::Warn,
            "disabled by configuration",
            started,
        );
    }

    let url = format!(
        "http://{}:{}/health",
        config.gateway.host, config.gateway.port
    );

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
    {
        Ok(client) => client,
        Err(e) => return CheckResult::new("gateway", CheckStatus::Fail, e.to_string(), started),
    };

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            CheckResult::new("gateway", CheckStatus::Pass, "watcher running", started)
        }
        _ => CheckResult::new(
            "gateway",
            CheckStatus::Warn,
            "watcher not running (start with `livio serve`)",
            started,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_result_captures_duration() {
        let started = Instant::now();
        let result = CheckResult::new("test", CheckStatus::Pass, "ok", started);
        assert_eq!(result.name, "test");
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.message, "ok");
    }

    #[tokio::test]
    async fn unconfigured_credentials_warn() {
        let config = LivioConfig::default();
        let result = check_credentials(&config).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("not configured"));
    }

    #[tokio::test]
    async fn unconfigured_channel_warns() {
        let config = LivioConfig::default();
        let result = check_channel(&config).await;
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn unconfigured_webhook_warns() {
        let config = LivioConfig::default();
        let result = check_webhook(&config).await;
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn disabled_gateway_warns() {
        let mut config = LivioConfig::default();
        config.gateway.enabled = false;
        let result = check_gateway(&config).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("disabled"));
    }
}
