// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel status source trait.

use async_trait::async_trait;

use crate::error::LivioError;
use crate::types::ChannelSnapshot;

/// Fetches one normalized status snapshot for a channel.
///
/// Implementations own their credential handling; a failed token refresh
/// surfaces as [`LivioError::Auth`] and a failed status request as
/// [`LivioError::Upstream`].
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, channel: &str) -> Result<ChannelSnapshot, LivioError>;
}
