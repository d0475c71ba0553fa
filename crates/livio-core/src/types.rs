// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common value types shared across the Livio workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized view of channel status at a point in time.
///
/// Produced fresh on every fetch and never mutated. `session_key` is stable
/// for the duration of one broadcast: it derives from the stream start time
/// when the upstream API provides one, falling back to a title+category
/// composite, and is always `None` while the channel is offline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub is_live: bool,
    pub session_key: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
}

impl ChannelSnapshot {
    /// An offline snapshot carries no session, title, or category.
    pub fn offline() -> Self {
        Self {
            is_live: false,
            session_key: None,
            title: None,
            category: None,
        }
    }
}

/// A fully-formed notification payload not yet delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationIntent {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<IntentEmbed>,
}

/// Optional structured fields attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentEmbed {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Read-only snapshot of the watcher's state, refreshed every poll cycle.
///
/// Written only by the poll loop; the status gateway serves it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchStatus {
    /// Channel slug being watched.
    pub channel: String,
    /// Live flag from the most recent successful fetch.
    pub live: bool,
    /// Completion time of the most recent poll cycle.
    pub last_poll_at: Option<DateTime<Utc>>,
    /// Error recorded by the most recent poll cycle, if any.
    pub last_error: Option<String>,
    /// Effective (post-clamp) poll interval.
    pub poll_interval_secs: u64,
}

impl WatchStatus {
    pub fn new(channel: impl Into<String>, poll_interval_secs: u64) -> Self {
        Self {
            channel: channel.into(),
            live: false,
            last_poll_at: None,
            last_error: None,
            poll_interval_secs,
        }
    }
}
