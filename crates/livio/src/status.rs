// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `livio status` command implementation.
//!
//! Connects to the gateway to display watcher state: live flag, last poll
//! time, last error, uptime. Falls back gracefully when the watcher is not
//! running.

use std::io::IsTerminal;
use std::time::Duration;

use livio_config::model::LivioConfig;
use livio_core::{LivioError, WatchStatus};
use serde::{Deserialize, Serialize};

/// Health endpoint response from the gateway.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub status: String,
    pub uptime_secs: Option<u64>,
    pub uptime_human: Option<String>,
    pub watch: Option<WatchStatus>,
    pub gateway_host: String,
    pub gateway_port: u16,
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Run the `livio status` command.
///
/// Queries the gateway's health and status endpoints. With `--json`,
/// outputs structured JSON for scripting. With `--plain` (or when stdout is
/// not a TTY), disables colors.
pub async fn run_status(config: &LivioConfig, json: bool, plain: bool) -> Result<(), LivioError> {
    let host = &config.gateway.host;
    let port = config.gateway.port;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| LivioError::Internal(format!("failed to create HTTP client: {e}")))?;

    let health = match client
        .get(format!("http://{host}:{port}/health"))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => resp.json::<HealthResponse>().await.ok(),
        _ => None,
    };

    let watch = match client
        .get(format!("http://{host}:{port}/status"))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => resp.json::<WatchStatus>().await.ok(),
        _ => None,
    };

    let use_color = !plain && std::io::stdout().is_terminal();

    match health {
        Some(health) => {
            let uptime_human = format_uptime(health.uptime_secs);
            if json {
                let resp = StatusResponse {
                    running: true,
                    status: health.status,
                    uptime_secs: Some(health.uptime_secs),
                    uptime_human: Some(uptime_human),
                    watch,
                    gateway_host: host.clone(),
                    gateway_port: port,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&resp).unwrap_or_else(|_| "{}".to_string())
                );
            } else {
                print_status_running(&health.status, &uptime_human, watch.as_ref(), use_color);
            }
        }
        None => {
            if json {
                let resp = StatusResponse {
                    running: false,
                    status: "not running".to_string(),
                    uptime_secs: None,
                    uptime_human: None,
                    watch: None,
                    gateway_host: host.clone(),
                    gateway_port: port,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&resp).unwrap_or_else(|_| "{}".to_string())
                );
            } else {
                print_status_offline(host, port, use_color);
            }
        }
    }

    Ok(())
}

/// Print running status with optional colors.
fn print_status_running(
    status: &str,
    uptime: &str,
    watch: Option<&WatchStatus>,
    use_color: bool,
) {
    println!();
    println!("  livio status");
    println!("  {}", "-".repeat(40));

    if use_color {
        use colored::Colorize;
        println!(
            "    State:      {} {} (uptime: {})",
            "✓".green(),
            status.green(),
            uptime
        );
    } else {
        println!("    State:      [OK] {status} (uptime: {uptime})");
    }

    if let Some(watch) = watch {
        println!("    Channel:    {}", watch.channel);
        let live = if watch.live { "LIVE" } else { "offline" };
        if use_color {
            use colored::Colorize;
            let live = if watch.live {
                live.red().bold().to_string()
            } else {
                live.to_string()
            };
            println!("    Stream:     {live}");
        } else {
            println!("    Stream:     {live}");
        }
        println!(
            "    Last poll:  {}",
            watch
                .last_poll_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".to_string())
        );
        println!(
            "    Last error: {}",
            watch.last_error.as_deref().unwrap_or("none")
        );
        println!("    Interval:   {}s", watch.poll_interval_secs);
    }

    println!();
}

/// Print offline status with optional colors.
fn print_status_offline(host: &str, port: u16, use_color: bool) {
    println!();
    println!("  livio status");
    println!("  {}", "-".repeat(40));

    if use_color {
        use colored::Colorize;
        println!("    State:      {} {}", "✗".red(), "not running".red());
    } else {
        println!("    State:      [FAIL] not running");
    }

    println!("    Endpoint:   http://{host}:{port}/health");
    println!();
    println!("  Start with: livio serve");
    println!();
}
