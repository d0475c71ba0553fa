// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as URL shapes, non-empty slugs, and non-zero intervals.

use crate::diagnostic::ConfigError;
use crate::model::LivioConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LivioConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // A configured channel slug must not be blank or contain separators.
    if let Some(ref channel) = config.kick.channel {
        let slug = channel.trim();
        if slug.is_empty() {
            errors.push(ConfigError::Validation {
                message: "kick.channel must not be empty".to_string(),
            });
        } else if slug.contains('/') || slug.contains(char::is_whitespace) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "kick.channel `{slug}` must be a bare channel slug, not a URL or phrase"
                ),
            });
        }
    }

    // URLs the watcher will POST/GET against must at least be http(s).
    for (key, value) in [
        ("kick.token_url", &config.kick.token_url),
        ("kick.api_base", &config.kick.api_base),
    ] {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{value}` must be an http(s) URL"),
            });
        }
    }

    if let Some(ref url) = config.discord.webhook_url
        && !url.starts_with("http://")
        && !url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!("discord.webhook_url `{url}` must be an http(s) URL"),
        });
    }

    // Zero intervals would busy-loop or defeat session reset entirely.
    if config.watch.poll_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "watch.poll_interval_secs must be greater than zero".to_string(),
        });
    }

    if config.watch.offline_reset_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "watch.offline_reset_secs must be greater than zero".to_string(),
        });
    }

    // Validate gateway host looks like a valid IP or hostname.
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = LivioConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_channel_fails_validation() {
        let mut config = LivioConfig::default();
        config.kick.channel = Some("  ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("kick.channel"))));
    }

    #[test]
    fn channel_url_fails_validation() {
        let mut config = LivioConfig::default();
        config.kick.channel = Some("https://kick.com/example".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("bare channel slug"))));
    }

    #[test]
    fn non_http_webhook_fails_validation() {
        let mut config = LivioConfig::default();
        config.discord.webhook_url = Some("ftp://discord.example/hook".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("webhook_url"))));
    }

    #[test]
    fn zero_poll_interval_fails_validation() {
        let mut config = LivioConfig::default();
        config.watch.poll_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("poll_interval_secs"))));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = LivioConfig::default();
        config.kick.channel = Some("example".to_string());
        config.discord.webhook_url =
            Some("https://discord.com/api/webhooks/1/token".to_string());
        config.watch.poll_interval_secs = 180;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_gateway_host_fails_validation() {
        let mut config = LivioConfig::default();
        config.gateway.host = "not a host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("gateway.host"))));
    }
}
