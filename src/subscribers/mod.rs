//! # Update subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriptionRegistry`]
//! that fans updates out to subscribers, and an optional built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! UpdateSource ── deliver(Update) ──► UpdateLog (rolling, newest first)
//!                       │
//!                       └──► SubscriptionRegistry::publish(&Update)
//!                                 │
//!                            ┌────┴──────┬──────────┬───────┐
//!                            ▼           ▼          ▼       ▼
//!                        role view    badge     LogWriter  ...
//! ```
//!
//! ## Implementing custom subscribers
//! Closures taking `&Update` work out of the box; types implement [`Subscribe`]
//! when they need a name or want to report failures.

#[cfg(feature = "logging")]
mod log;
mod registry;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use registry::{Delivery, SubscriptionId, SubscriptionRegistry};
pub use subscribe::Subscribe;
