// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session tracking and poll loop for the Livio watcher.
//!
//! [`SessionTracker`] is the pure state machine that decides when a
//! notification is due; [`Watcher`] drives it: fetch from a
//! [`livio_core::StatusSource`], feed the tracker, hand any intent to a
//! [`livio_core::NotifySink`], and publish a [`livio_core::WatchStatus`]
//! snapshot every cycle.

pub mod format;
pub mod tracker;
pub mod watcher;

pub use format::IntentFormatter;
pub use tracker::SessionTracker;
pub use watcher::{Watcher, MIN_POLL_INTERVAL_SECS};
