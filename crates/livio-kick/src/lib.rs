// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kick.com integration for the Livio watcher.
//!
//! Provides [`TokenCache`], an OAuth access-token cache that refreshes on
//! demand, and [`KickClient`], a bearer-authenticated channel status
//! fetcher implementing [`livio_core::StatusSource`].

pub mod client;
pub mod token;

pub use client::KickClient;
pub use token::TokenCache;
