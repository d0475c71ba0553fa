// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification intent construction.

use livio_core::{ChannelSnapshot, IntentEmbed, NotificationIntent};

/// Builds notification payloads for one watched channel.
#[derive(Debug, Clone)]
pub struct IntentFormatter {
    channel: String,
    mention_role_id: Option<String>,
}

impl IntentFormatter {
    pub fn new(channel: impl Into<String>, mention_role_id: Option<String>) -> Self {
        Self {
            channel: channel.into(),
            mention_role_id,
        }
    }

    fn channel_url(&self) -> String {
        format!("https://kick.com/{}", self.channel)
    }

    fn with_mention(&self, content: String) -> String {
        match self.mention_role_id {
            Some(ref role) => format!("<@&{role}> {content}"),
            None => content,
        }
    }

    /// The go-live notification for a live snapshot.
    pub fn live_intent(&self, snapshot: &ChannelSnapshot) -> NotificationIntent {
        let url = self.channel_url();
        let content = self.with_mention(format!("🔴 **LIVE NOW!**\n{url}"));

        let embed = snapshot.title.as_ref().map(|title| IntentEmbed {
            title: title.clone(),
            url: url.clone(),
            description: snapshot.category.clone(),
        });

        NotificationIntent { content, embed }
    }

    /// A synthetic notification for the manual test trigger.
    pub fn test_intent(&self) -> NotificationIntent {
        let url = self.channel_url();
        NotificationIntent {
            content: self.with_mention(format!("🔧 Livio test notification for {url}")),
            embed: None,
        }
    }
}
