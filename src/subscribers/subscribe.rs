//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging update consumers (role views,
//! notification badges, audit trails) into a feed. Plain closures taking
//! `&Update` implement it automatically.
//!
//! ## Contract
//! - Subscribers run **sequentially** in registration order for each publish.
//!   A slow subscriber delays the ones registered after it.
//! - Returning `Err` or panicking is contained by the registry: the failure is
//!   logged and delivery continues with the next subscriber.
//!
//! ## Example
//! ```rust
//! use feedvisor::{Subscribe, SubscriberError, Update, UpdateKind};
//! use async_trait::async_trait;
//!
//! struct ComplianceBadge;
//!
//! #[async_trait]
//! impl Subscribe for ComplianceBadge {
//!     async fn on_update(&self, update: &Update) -> Result<(), SubscriberError> {
//!         if update.kind == UpdateKind::Compliance {
//!             // bump the badge counter...
//!         }
//!         Ok(())
//!     }
//!     fn name(&self) -> &'static str { "compliance-badge" }
//! }
//! ```

use async_trait::async_trait;

use crate::error::SubscriberError;
use crate::events::Update;

/// Contract for update subscribers.
///
/// Implementations should avoid blocking the async runtime (prefer async I/O and
/// cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single update.
    ///
    /// # Parameters
    /// - `update`: Reference to the update; every subscriber of one publish sees the same value
    async fn on_update(&self, update: &Update) -> Result<(), SubscriberError>;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[async_trait]
impl<F> Subscribe for F
where
    F: Fn(&Update) + Send + Sync + 'static,
{
    async fn on_update(&self, update: &Update) -> Result<(), SubscriberError> {
        (self)(update);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}
