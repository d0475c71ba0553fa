// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The poll loop driving fetch -> track -> deliver.
//!
//! One long-lived task, strictly sequential within a cycle. Every error a
//! cycle produces is caught, recorded in the shared [`WatchStatus`], and
//! swallowed; the next cycle always runs after the sleep. This is the
//! system's sole failure-isolation boundary.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use livio_core::{LivioError, NotifySink, StatusSource, WatchStatus};

use crate::tracker::SessionTracker;

/// Floor for the poll interval, protecting the upstream API.
pub const MIN_POLL_INTERVAL_SECS: u64 = 120;

/// The poll loop: periodically fetches channel status, feeds the tracker,
/// and delivers any resulting notification.
pub struct Watcher<S, N> {
    source: S,
    sink: N,
    tracker: SessionTracker,
    channel: String,
    poll_interval: Duration,
    status: Arc<RwLock<WatchStatus>>,
}

impl<S: StatusSource, N: NotifySink> Watcher<S, N> {
    /// Creates a watcher. Intervals below [`MIN_POLL_INTERVAL_SECS`] are
    /// clamped up with a warning.
    pub fn new(
        source: S,
        sink: N,
        tracker: SessionTracker,
        channel: impl Into<String>,
        poll_interval_secs: u64,
        status: Arc<RwLock<WatchStatus>>,
    ) -> Self {
        let effective = if poll_interval_secs < MIN_POLL_INTERVAL_SECS {
            warn!(
                configured = poll_interval_secs,
                clamped = MIN_POLL_INTERVAL_SECS,
                "poll interval below upstream-friendly minimum, clamping"
            );
            MIN_POLL_INTERVAL_SECS
        } else {
            poll_interval_secs
        };

        Self {
            source,
            sink,
            tracker,
            channel: channel.into(),
            poll_interval: Duration::from_secs(effective),
            status,
        }
    }

    /// The effective (post-clamp) poll interval.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Runs the poll loop until the token is cancelled.
    ///
    /// The first cycle runs immediately; each subsequent cycle after the
    /// configured interval.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            channel = self.channel.as_str(),
            interval_secs = self.poll_interval.as_secs(),
            "watcher started"
        );

        let mut interval = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.poll_once().await;
                }
                _ = cancel.cancelled() => {
                    info!("watcher shutting down");
                    break;
                }
            }
        }
    }

    /// Runs one poll cycle immediately and records its outcome in the
    /// shared status. `run` calls this on every tick; integration tests
    /// drive it directly to step through cycles deterministically.
    pub async fn poll_once(&mut self) {
        let outcome = self.cycle().await;

        let mut status = self.status.write().await;
        status.last_poll_at = Some(Utc::now());
        match outcome {
            Ok(()) => status.last_error = None,
            Err(ref e) => {
                // The three declared kinds are expected operational noise;
                // anything else gets logged as unexpected.
                match e {
                    LivioError::Auth { .. } => {
                        warn!(error = %e, "cycle skipped: credential refresh failed")
                    }
                    LivioError::Upstream { .. } => {
                        warn!(error = %e, "cycle skipped: channel status fetch failed")
                    }
                    LivioError::Delivery { .. } => {
                        warn!(error = %e, "notification delivery failed")
                    }
                    other => error!(error = %other, "unexpected error in poll cycle"),
                }
                status.last_error = Some(e.to_string());
            }
        }
    }

    /// One cycle: fetch -> track -> deliver.
    ///
    /// The live flag is published as soon as the fetch succeeds, so a
    /// later delivery failure still leaves an accurate status snapshot.
    /// A fetch failure keeps the flag from the last successful cycle.
    async fn cycle(&mut self) -> Result<(), LivioError> {
        let snapshot = self.source.fetch(&self.channel).await?;
        self.status.write().await.live = snapshot.is_live;

        if let Some(intent) = self.tracker.observe(&snapshot, Utc::now()) {
            info!(channel = self.channel.as_str(), "channel went live, notifying");
            let delivery_status = self.sink.deliver(&intent).await?;
            info!(status = delivery_status, "notification delivered");
        } else {
            debug!(live = snapshot.is_live, "no notification due");
        }

        Ok(())
    }
}
