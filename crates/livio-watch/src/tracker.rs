// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session-tracking state machine.
//!
//! Turns a sequence of noisy, independently-fetched status snapshots into at
//! most one notification per broadcast session. Pure: [`SessionTracker::observe`]
//! is a function of (snapshot, state, now) with no I/O, so every scenario is
//! unit-testable with a synthetic clock.
//!
//! Announce rules, per live snapshot:
//! - Session memory resets when the channel has been offline for at least
//!   the reset threshold (or this is the first observation ever).
//! - An intent is emitted when nothing has been announced for the current
//!   session, or when a non-empty session key differs from the last
//!   announced one (a restarted broadcast inside the reset window).
//!
//! The announce memory deliberately survives an offline flicker shorter
//! than the threshold: a flicker followed by the same (or an absent) key is
//! the same broadcast, while a flicker followed by a different genuine key
//! re-announces. Offline snapshots never emit.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use livio_core::{ChannelSnapshot, NotificationIntent};

use crate::format::IntentFormatter;

/// Announce memory for the current broadcast session.
#[derive(Debug, Clone, Default)]
struct SessionState {
    announced: bool,
    last_session_key: Option<String>,
    offline_since: Option<DateTime<Utc>>,
}

/// Consumes snapshots and decides whether a notification is due.
#[derive(Debug)]
pub struct SessionTracker {
    formatter: IntentFormatter,
    reset_threshold: Duration,
    state: SessionState,
}

impl SessionTracker {
    /// Creates a tracker with the given offline-reset threshold.
    pub fn new(formatter: IntentFormatter, reset_threshold_secs: u64) -> Self {
        Self {
            formatter,
            reset_threshold: Duration::seconds(reset_threshold_secs as i64),
            state: SessionState::default(),
        }
    }

    /// Feed one snapshot; returns the notification intent when one is due.
    pub fn observe(
        &mut self,
        snapshot: &ChannelSnapshot,
        now: DateTime<Utc>,
    ) -> Option<NotificationIntent> {
        if !snapshot.is_live {
            if self.state.offline_since.is_none() {
                self.state.offline_since = Some(now);
                debug!("channel observed offline");
            }
            return None;
        }

        // A long enough offline gap starts a new session.
        if let Some(offline_since) = self.state.offline_since
            && now - offline_since >= self.reset_threshold
        {
            debug!(
                offline_secs = (now - offline_since).num_seconds(),
                "offline gap exceeded reset threshold, new session"
            );
            self.state.announced = false;
            self.state.last_session_key = None;
        }
        self.state.offline_since = None;

        let key_changed = snapshot
            .session_key
            .as_deref()
            .is_some_and(|key| self.state.last_session_key.as_deref() != Some(key));

        if self.state.announced && !key_changed {
            return None;
        }

        self.state.announced = true;
        self.state.last_session_key = snapshot.session_key.clone();
        Some(self.formatter.live_intent(snapshot))
    }
}
