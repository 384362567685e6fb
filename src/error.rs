//! Error types used by the feed runtime and its subscribers.
//!
//! This module defines two enums:
//!
//! - [`FeedError`] errors raised while building or starting a feed.
//! - [`SubscriberError`] failures a subscriber reports for a single update.
//!
//! Both provide `as_label` for logs. Neither ever escapes `publish`: subscriber
//! failures are contained and logged by the registry.

use thiserror::Error;

/// # Errors produced by the feed runtime.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// A configuration value is out of its accepted range.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// `start` was called outside a tokio runtime; timers cannot be scheduled.
    #[error("no tokio runtime available to schedule feed timers")]
    NoRuntime,
}

impl FeedError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use feedvisor::FeedError;
    ///
    /// let err = FeedError::NoRuntime;
    /// assert_eq!(err.as_label(), "feed_no_runtime");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FeedError::InvalidConfig { .. } => "feed_invalid_config",
            FeedError::NoRuntime => "feed_no_runtime",
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        FeedError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// # Failures reported by a subscriber while handling one update.
///
/// Returned from [`Subscribe::on_update`](crate::Subscribe::on_update), or
/// synthesized by the registry when a subscriber panics.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriberError {
    /// The subscriber could not process the update.
    #[error("subscriber failed: {reason}")]
    Failed {
        /// Human-readable failure message.
        reason: String,
    },

    /// The subscriber panicked; the panic payload is captured as text.
    #[error("subscriber panicked: {info}")]
    Panicked {
        /// Panic message, or `"unknown panic"` when the payload is not a string.
        info: String,
    },
}

impl SubscriberError {
    /// Convenience constructor for [`SubscriberError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        SubscriberError::Failed {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use feedvisor::SubscriberError;
    ///
    /// let err = SubscriberError::failed("render queue closed");
    /// assert_eq!(err.as_label(), "subscriber_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscriberError::Failed { .. } => "subscriber_failed",
            SubscriberError::Panicked { .. } => "subscriber_panicked",
        }
    }
}
