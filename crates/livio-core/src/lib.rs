// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Livio watcher.
//!
//! Provides the error taxonomy, the value types that flow between the
//! fetcher, tracker, and sink, and the seam traits the poll loop is
//! generic over.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{body_excerpt, LivioError};
pub use traits::{NotifySink, StatusSource};
pub use types::{ChannelSnapshot, IntentEmbed, NotificationIntent, WatchStatus};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn livio_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _config = LivioError::Config("test".into());
        let _auth = LivioError::Auth {
            message: "test".into(),
            source: None,
        };
        let _upstream = LivioError::Upstream {
            status: Some(500),
            body_excerpt: "test".into(),
        };
        let _delivery = LivioError::Delivery {
            status: Some(429),
            body_excerpt: "test".into(),
        };
        let _gateway = LivioError::Gateway {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _internal = LivioError::Internal("test".into());
    }

    #[test]
    fn seam_traits_are_object_safe() {
        // The watcher and gateway hold these behind Arc<dyn ...>; this
        // won't compile if either trait loses object safety.
        fn _assert_source(_: &dyn StatusSource) {}
        fn _assert_sink(_: &dyn NotifySink) {}
    }
}
