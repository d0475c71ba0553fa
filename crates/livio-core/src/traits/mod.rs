// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits between the poll loop and its collaborators.
//!
//! The poll loop is generic over these traits so the session-tracking logic
//! can be exercised in tests without a network.

pub mod sink;
pub mod source;

pub use sink::NotifySink;
pub use source::StatusSource;
