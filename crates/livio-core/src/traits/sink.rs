// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification sink trait.

use async_trait::async_trait;

use crate::error::LivioError;
use crate::types::NotificationIntent;

/// Delivers a notification intent to its destination.
#[async_trait]
pub trait NotifySink: Send + Sync {
    /// Delivers the intent, returning the final HTTP status code.
    ///
    /// Implementations may retry internally (e.g. once after a rate-limit
    /// response); a final failure is [`LivioError::Delivery`]. The caller
    /// does not retry within the same cycle.
    async fn deliver(&self, intent: &NotificationIntent) -> Result<u16, LivioError>;
}

// The watcher owns its sink while the gateway's test trigger shares it;
// both work against the same Arc.
#[async_trait]
impl<T: NotifySink + ?Sized> NotifySink for std::sync::Arc<T> {
    async fn deliver(&self, intent: &NotificationIntent) -> Result<u16, LivioError> {
        (**self).deliver(intent).await
    }
}
